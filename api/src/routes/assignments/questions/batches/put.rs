use crate::{
    response::ApiResponse,
    routes::common::{service_error_response, validation_error_response},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::batching_service::{BatchingService, BatchingSettings};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GradeBatchRequest {
    #[validate(range(min = 0, message = "grade must not be negative"))]
    pub grade: i64,

    #[serde(default)]
    #[validate(length(max = 10000, message = "comments must be at most 10000 characters"))]
    pub comments: String,
}

/// PUT /api/assignments/{assignment_id}/questions/{question_id}/batches/{batch_id}
///
/// Set a batch's grade and comments. Every response in the batch inherits them when grades
/// are saved. A grade above the question's `max_grade` is accepted.
///
/// ### Request Body
/// ```json
/// { "grade": 8, "comments": "Correct up to rounding" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated batch view
/// - `400 Bad Request` if the grade is negative
/// - `404 Not Found` if the batch does not belong to this question
pub async fn grade_batch(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id, batch_id)): Path<(i64, i64, i64)>,
    Json(req): Json<GradeBatchRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        return validation_error_response(&validation_errors);
    }

    let db = app_state.db();
    if let Err(e) = BatchingService::set_grade(
        db,
        assignment_id,
        question_id,
        batch_id,
        req.grade,
        &req.comments,
    )
    .await
    {
        return service_error_response(e);
    }

    let settings = BatchingSettings::from_config();
    match BatchingService::get_batch(db, &settings, assignment_id, question_id, batch_id).await {
        Ok(batch) => (
            StatusCode::OK,
            Json(ApiResponse::success(batch, "Batch graded successfully")),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
