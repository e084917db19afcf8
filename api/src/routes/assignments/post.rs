use crate::{
    response::ApiResponse,
    routes::common::{service_error_response, validation_error_response},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use services::assignment_service::{AssignmentService, AssignmentSummary, CreateAssignment};
use services::submission_service::LoadReport;
use util::state::AppState;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(
        length(min = 1, max = 255, message = "Assignment name must be 1-255 characters"),
        custom(function = "validate_directory_name")
    )]
    pub name: String,
}

/// The name doubles as the submissions directory, so it must be a single path segment.
fn validate_directory_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        let mut err = ValidationError::new("directory_name");
        err.message = Some("Assignment name must be a single directory name".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CreateAssignmentResponse {
    pub assignment: AssignmentSummary,
    pub loaded: LoadReport,
}

/// POST /api/assignments
///
/// Create an assignment and load every student's responses from
/// `{STORAGE_ROOT}/submissions/{name}/{student_id}/{var_name}.{extension}`.
///
/// The assignment and its responses are created together: if any file cannot be loaded
/// nothing is stored.
///
/// ### Request Body
/// ```json
/// { "name": "hw1" }
/// ```
///
/// ### Responses
/// - `201 Created`
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "assignment": { "id": 1, "name": "hw1", "total_points": 0, "total_questions": 0, "total_submissions": 3 },
///     "loaded": { "students": 3, "responses": 5 }
///   },
///   "message": "Assignment created successfully"
/// }
/// ```
///
/// - `400 Bad Request` if the name is empty or not a single directory name
/// - `409 Conflict` if an assignment with that name already exists
/// - `422 Unprocessable Entity` if the submissions directory has an invalid layout or an unknown file extension
pub async fn create_assignment(
    State(app_state): State<AppState>,
    Json(req): Json<CreateAssignmentRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        return validation_error_response(&validation_errors);
    }

    let submissions_root = util::paths::submissions_root();
    match AssignmentService::create(
        app_state.db(),
        CreateAssignment { name: req.name },
        &submissions_root,
    )
    .await
    {
        Ok((assignment, loaded)) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                CreateAssignmentResponse { assignment, loaded },
                "Assignment created successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
