//! Question routes module.
//!
//! Provides `/assignments/{assignment_id}/questions` and nests each question's batches.

use axum::{
    Router,
    routing::{delete, get, post},
};
use batches::batch_routes;
use delete::delete_question;
use get::{get_question, get_questions};
use post::create_question;
use util::state::AppState;

pub mod batches;
pub mod delete;
pub mod get;
pub mod post;

/// Builds the `/assignments/{assignment_id}/questions` route group.
///
/// Routes:
/// - `POST   /questions`                → Create a question
/// - `GET    /questions`                → List the assignment's questions
/// - `GET    /questions/{question_id}`  → Get one question
/// - `DELETE /questions/{question_id}`  → Delete a question and its batches
///
/// Nested routes:
/// - `/questions/{question_id}/batches` → `batch_routes`
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_question))
        .route("/", get(get_questions))
        .route("/{question_id}", get(get_question))
        .route("/{question_id}", delete(delete_question))
        .nest("/{question_id}/batches", batch_routes())
}
