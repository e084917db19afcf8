use crate::{response::ApiResponse, routes::common::service_error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::batching_service::{BatchingService, BatchingSettings};
use util::state::AppState;

/// POST /api/assignments/{assignment_id}/questions/{question_id}/batches
///
/// Discard the question's batches and partition its responses again.
///
/// Responses are compared with the comparator of their datatype after the question's
/// preprocessing script (if any) has run on them. Each response joins the first batch whose
/// representative it matches; otherwise it starts a new batch. A response whose file cannot be
/// read gets a batch of its own and is listed in `decode_failures`.
///
/// Only one rebuild per question runs at a time; a second request waits for the first.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "question_id": 1,
///     "batches": 2,
///     "responses": 3,
///     "transform_version": null,
///     "decode_failures": [],
///     "transform_fallbacks": 0
///   },
///   "message": "Batches rebuilt successfully"
/// }
/// ```
///
/// - `404 Not Found` if the assignment or question does not exist
/// - `422 Unprocessable Entity` if the preprocessing script does not compile; existing batches are kept
pub async fn rebuild_batches(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id)): Path<(i64, i64)>,
) -> Response {
    let settings = BatchingSettings::from_config();
    match BatchingService::rebuild(
        app_state.db(),
        app_state.rebuild_locks(),
        &settings,
        assignment_id,
        question_id,
    )
    .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Batches rebuilt successfully")),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
