use crate::response::ApiResponse;
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use util::state::AppState;

/// Builds the `/health` route group.
///
/// This includes a single `GET /health` endpoint used by uptime checks.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Returns a simple success response when the API is running and its database answers.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": "OK",
///   "message": "Health check passed"
/// }
/// ```
///
/// - `503 Service Unavailable` if the database cannot be reached
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success("UNAVAILABLE", "Database unreachable")),
            )
        }
    }
}
