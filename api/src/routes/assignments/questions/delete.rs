use crate::routes::common::service_error_response;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::question_service::QuestionService;
use util::state::AppState;

/// DELETE /api/assignments/{assignment_id}/questions/{question_id}
///
/// Delete a question with its batches.
///
/// ### Responses
/// - `204 No Content`, also when the question did not exist
pub async fn delete_question(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id)): Path<(i64, i64)>,
) -> Response {
    match QuestionService::delete(app_state.db(), assignment_id, question_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response(e),
    }
}
