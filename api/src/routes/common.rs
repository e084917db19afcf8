use crate::response::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::error::ServiceError;
use validator::ValidationErrors;

/// Join every field's validation message into one line.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// `400 Bad Request` carrying the joined validation messages.
pub fn validation_error_response(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(format_validation_errors(errors))),
    )
        .into_response()
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
        ServiceError::Batcher(_) if err.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a service failure onto the JSON error envelope.
///
/// Server-side failures are logged and answered with a generic message.
pub fn service_error_response(err: ServiceError) -> Response {
    let status = status_for(&err);
    let message = if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}
