use axum::{Router, routing::post};
use post::save_grades;
use util::state::AppState;

pub mod post;

/// Builds the `/assignments/{assignment_id}/grades` route group.
///
/// Routes:
/// - `POST /grades` → Write the grades table and per-student feedback
pub fn grade_routes() -> Router<AppState> {
    Router::new().route("/", post(save_grades))
}
