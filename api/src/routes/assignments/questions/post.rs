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
use services::question_service::{CreateQuestion, QuestionService};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 255, message = "Question name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Variable name must be 1-255 characters"))]
    pub var_name: String,

    #[validate(range(min = 0, message = "max_grade must not be negative"))]
    pub max_grade: i64,

    #[validate(range(min = 0.0, message = "tolerance must not be negative"))]
    pub tolerance: Option<f64>,

    pub preprocessing: Option<String>,
}

/// POST /api/assignments/{assignment_id}/questions
///
/// Create a question graded over the responses stored under `var_name`.
///
/// `preprocessing` is an optional script defining `fn fun(student_id, data)`. It runs on both
/// sides of every comparison and must return a value of the same type as `data`. The script is
/// compiled before the question is stored.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Part A",
///   "var_name": "x",
///   "max_grade": 10,
///   "tolerance": 0.01,
///   "preprocessing": "fn fun(student_id, data) { data.to_lower() }"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the stored question (no batches yet)
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` if the assignment does not exist
/// - `422 Unprocessable Entity` if the preprocessing script does not compile
pub async fn create_question(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<CreateQuestionRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        return validation_error_response(&validation_errors);
    }

    let params = CreateQuestion {
        name: req.name,
        var_name: req.var_name,
        max_grade: req.max_grade,
        tolerance: req.tolerance,
        preprocessing: req.preprocessing,
    };
    match QuestionService::create(app_state.db(), assignment_id, params).await {
        Ok(question) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                question,
                "Question created successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}
