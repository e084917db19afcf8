use crate::{response::ApiResponse, routes::common::service_error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::assignment_service::{AssignmentService, AssignmentSummary};
use util::state::AppState;

/// GET /api/assignments
///
/// List every assignment with its derived totals, ordered by ID.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     { "id": 1, "name": "hw1", "total_points": 15, "total_questions": 2, "total_submissions": 3 }
///   ],
///   "message": "Assignments retrieved successfully"
/// }
/// ```
///
/// - `500 Internal Server Error` on database failure
pub async fn get_assignments(State(app_state): State<AppState>) -> Response {
    match AssignmentService::list(app_state.db()).await {
        Ok(assignments) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                assignments,
                "Assignments retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// GET /api/assignments/{assignment_id}
///
/// ### Responses
/// - `200 OK` with an [`AssignmentSummary`]
/// - `404 Not Found` if the assignment does not exist
pub async fn get_assignment(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Response {
    match AssignmentService::get(app_state.db(), assignment_id).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::<AssignmentSummary>::success(
                summary,
                "Assignment retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
