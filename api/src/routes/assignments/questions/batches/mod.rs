//! Batch routes module.
//!
//! A batch is a set of equivalent responses to one question. Grading a batch grades every
//! response in it.

use axum::{
    Router,
    routing::{get, post, put},
};
use get::{get_batch, get_batches};
use post::rebuild_batches;
use put::grade_batch;
use util::state::AppState;

pub mod get;
pub mod post;
pub mod put;

/// Builds the `/assignments/{assignment_id}/questions/{question_id}/batches` route group.
///
/// Routes:
/// - `GET  /batches`             → List batches (`?create=true` rebuilds them first)
/// - `POST /batches`             → Rebuild batches
/// - `GET  /batches/{batch_id}`  → Get one batch
/// - `PUT  /batches/{batch_id}`  → Grade a batch
pub fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_batches))
        .route("/", post(rebuild_batches))
        .route("/{batch_id}", get(get_batch))
        .route("/{batch_id}", put(grade_batch))
}
