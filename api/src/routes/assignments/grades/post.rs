use crate::{response::ApiResponse, routes::common::service_error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::grade_service::GradeService;
use util::state::AppState;

/// POST /api/assignments/{assignment_id}/grades
///
/// Save the assignment's grades. Every student inherits the grade and comments of the batch
/// each of their responses sits in; a question without a response scores 0.
///
/// Writes:
/// - `{STORAGE_ROOT}/grades/{name}/{name}.csv` with one row per student and a `Total` column
/// - `{STORAGE_ROOT}/feedback/{name}/{student_id}.txt`, replacing earlier feedback files
///
/// ### Responses
/// - `200 OK` with the exported grade sheet
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "assignment_id": 1,
///     "students": 3,
///     "questions": 2,
///     "sheet": { "columns": [...], "rows": [...] }
///   },
///   "message": "Grades saved successfully"
/// }
/// ```
///
/// - `404 Not Found` if the assignment does not exist
/// - `422 Unprocessable Entity` if a student has two responses in the same question
/// - `500 Internal Server Error` if the files cannot be written
pub async fn save_grades(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Response {
    match GradeService::save_grades_to_storage(app_state.db(), assignment_id).await {
        Ok(export) => (
            StatusCode::OK,
            Json(ApiResponse::success(export, "Grades saved successfully")),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
