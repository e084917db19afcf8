use crate::{response::ApiResponse, routes::common::service_error_response};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::batching_service::{BatchingService, BatchingSettings};
use util::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BatchListQuery {
    /// Rebuild the question's batches before listing them.
    #[serde(default)]
    pub create: bool,
}

/// GET /api/assignments/{assignment_id}/questions/{question_id}/batches
///
/// List the question's batches in creation order. With `?create=true` the batches are
/// rebuilt first, which discards existing grades.
///
/// `data` of each batch shows its representative response after preprocessing.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 4,
///       "grade": 0,
///       "comments": "",
///       "question_id": 1,
///       "assignment_id": 1,
///       "datatype": "numeric",
///       "member_count": 2,
///       "total_responses": 3,
///       "data": "1"
///     }
///   ],
///   "message": "Batches retrieved successfully"
/// }
/// ```
///
/// - `404 Not Found` if the assignment or question does not exist
/// - `422 Unprocessable Entity` if `create=true` and the preprocessing script does not compile
pub async fn get_batches(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id)): Path<(i64, i64)>,
    Query(query): Query<BatchListQuery>,
) -> Response {
    let db = app_state.db();
    let settings = BatchingSettings::from_config();

    if query.create {
        if let Err(e) = BatchingService::rebuild(
            db,
            app_state.rebuild_locks(),
            &settings,
            assignment_id,
            question_id,
        )
        .await
        {
            return service_error_response(e);
        }
    }

    match BatchingService::list_batches(db, &settings, assignment_id, question_id).await {
        Ok(batches) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                batches,
                "Batches retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// GET /api/assignments/{assignment_id}/questions/{question_id}/batches/{batch_id}
///
/// ### Responses
/// - `200 OK` with the batch view
/// - `404 Not Found` if the batch does not belong to this question
pub async fn get_batch(
    State(app_state): State<AppState>,
    Path((assignment_id, question_id, batch_id)): Path<(i64, i64, i64)>,
) -> Response {
    let settings = BatchingSettings::from_config();
    match BatchingService::get_batch(
        app_state.db(),
        &settings,
        assignment_id,
        question_id,
        batch_id,
    )
    .await
    {
        Ok(batch) => (
            StatusCode::OK,
            Json(ApiResponse::success(batch, "Batch retrieved successfully")),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
