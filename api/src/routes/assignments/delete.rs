use crate::routes::common::service_error_response;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::assignment_service::AssignmentService;
use util::state::AppState;

/// DELETE /api/assignments/{assignment_id}
///
/// Delete an assignment with its questions, batches, responses and submissions.
/// Files under the storage root are left in place.
///
/// ### Responses
/// - `204 No Content`, also when the assignment did not exist
/// - `500 Internal Server Error` on database failure
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Response {
    match AssignmentService::delete(app_state.db(), assignment_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response(e),
    }
}
