use crate::{response::ApiResponse, routes::common::service_error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::question_service::QuestionService;
use util::state::AppState;

/// GET /api/assignments/{assignment_id}/questions
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 1,
///       "assignment_id": 1,
///       "name": "Part A",
///       "var_name": "x",
///       "max_grade": 10,
///       "tolerance": 0.001,
///       "preprocessing": null,
///       "total_batches": 2,
///       "total_responses": 3
///     }
///   ],
///   "message": "Questions retrieved successfully"
/// }
/// ```
///
/// - `404 Not Found` if the assignment does not exist
pub async fn get_questions(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Response {
    match QuestionService::list(app_state.db(), assignment_id).await {
        Ok(questions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                questions,
                "Questions retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// GET /api/assignments/{assignment_id}/questions/{question_id}
///
/// ### Responses
/// - `200 OK` with the question and its batch counts
/// - `404 Not Found` if the question does not exist in this assignment
pub async fn get_question(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id)): Path<(i64, i64)>,
) -> Response {
    match QuestionService::get(app_state.db(), assignment_id, question_id).await {
        Ok(question) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                question,
                "Question retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
