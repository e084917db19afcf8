use crate::error::ServiceError;
use batcher::comparators::tolerance_comparator::DEFAULT_TOLERANCE;
use batcher::preprocessing::script_transform::ScriptTransform;
use db::models::{assignment, batch, batch_response, question};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub name: String,
    pub var_name: String,
    pub max_grade: i64,
    /// Defaults to [`DEFAULT_TOLERANCE`].
    pub tolerance: Option<f64>,
    pub preprocessing: Option<String>,
}

/// A question with its batching progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub var_name: String,
    pub max_grade: i64,
    pub tolerance: f64,
    pub preprocessing: Option<String>,
    pub total_batches: usize,
    /// Responses placed in one of the question's batches.
    pub total_responses: u64,
}

pub struct QuestionService;

impl QuestionService {
    async fn summarise(
        db: &DatabaseConnection,
        model: question::Model,
    ) -> Result<QuestionSummary, ServiceError> {
        let batch_ids: Vec<i64> = batch::Model::get_by_question_id(db, model.id)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();
        let total_batches = batch_ids.len();
        let total_responses = batch_response::Model::count_for_batches(db, batch_ids).await?;
        Ok(QuestionSummary {
            id: model.id,
            assignment_id: model.assignment_id,
            name: model.name,
            var_name: model.var_name,
            max_grade: model.max_grade,
            tolerance: model.tolerance,
            preprocessing: model.preprocessing,
            total_batches,
            total_responses,
        })
    }

    /// Create a question after checking that its preprocessing script compiles.
    pub async fn create(
        db: &DatabaseConnection,
        assignment_id: i64,
        params: CreateQuestion,
    ) -> Result<QuestionSummary, ServiceError> {
        if assignment::Model::get_by_id(db, assignment_id).await?.is_none() {
            return Err(ServiceError::not_found("Assignment"));
        }

        let tolerance = params.tolerance.unwrap_or(DEFAULT_TOLERANCE);
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ServiceError::Invalid(
                "tolerance must be a non-negative number".into(),
            ));
        }

        let preprocessing = params
            .preprocessing
            .filter(|source| !source.trim().is_empty());
        if let Some(source) = &preprocessing {
            ScriptTransform::compile(source)?;
        }

        let created = question::Model::create(
            db,
            assignment_id,
            &params.name,
            &params.var_name,
            params.max_grade,
            tolerance,
            preprocessing.as_deref(),
        )
        .await?;

        info!(
            assignment_id,
            question_id = created.id,
            var_name = %created.var_name,
            "Created question"
        );
        Self::summarise(db, created).await
    }

    pub async fn list(
        db: &DatabaseConnection,
        assignment_id: i64,
    ) -> Result<Vec<QuestionSummary>, ServiceError> {
        if assignment::Model::get_by_id(db, assignment_id).await?.is_none() {
            return Err(ServiceError::not_found("Assignment"));
        }
        let mut out = Vec::new();
        for model in question::Model::get_by_assignment_id(db, assignment_id).await? {
            out.push(Self::summarise(db, model).await?);
        }
        Ok(out)
    }

    pub async fn get(
        db: &DatabaseConnection,
        assignment_id: i64,
        question_id: i64,
    ) -> Result<QuestionSummary, ServiceError> {
        let model = question::Model::get_in_assignment(db, assignment_id, question_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Question"))?;
        Self::summarise(db, model).await
    }

    /// Delete a question and its batches. Returns `false` if it did not exist.
    pub async fn delete(
        db: &DatabaseConnection,
        assignment_id: i64,
        question_id: i64,
    ) -> Result<bool, ServiceError> {
        if question::Model::get_in_assignment(db, assignment_id, question_id)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        let txn = db.begin().await?;
        let deleted = question::Model::delete_cascade(&txn, question_id).await?;
        txn.commit().await?;
        Ok(deleted)
    }
}
