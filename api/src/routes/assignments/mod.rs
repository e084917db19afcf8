//! Assignment routes module.
//!
//! Provides the `/assignments` route group and nests questions, batches and the grade export
//! under it.

use axum::{
    Router,
    routing::{delete, get, post},
};
use delete::delete_assignment;
use get::{get_assignment, get_assignments};
use grades::grade_routes;
use post::create_assignment;
use questions::question_routes;
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod grades;
pub mod post;
pub mod questions;

/// Builds and returns the `/assignments` route group.
///
/// Routes:
/// - `POST   /assignments`                  → Create an assignment and load its submissions
/// - `GET    /assignments`                  → List assignments
/// - `GET    /assignments/{assignment_id}`  → Get assignment details
/// - `DELETE /assignments/{assignment_id}`  → Delete an assignment and everything under it
///
/// Nested routes:
/// - `/assignments/{assignment_id}/questions` → `question_routes`
/// - `/assignments/{assignment_id}/grades`    → `grade_routes`
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route("/", get(get_assignments))
        .route("/{assignment_id}", get(get_assignment))
        .route("/{assignment_id}", delete(delete_assignment))
        .nest("/{assignment_id}/questions", question_routes())
        .nest("/{assignment_id}/grades", grade_routes())
}
