//! Batch rebuilds, batch views and batch grading.
//!
//! A rebuild replaces every batch of a question with a fresh partition of its responses. The
//! partition is computed first (off the async runtime) and then written in one transaction, so a
//! failed rebuild leaves the previous batches in place. Rebuilds of the same question are
//! serialised through [`RebuildLocks`].

use crate::error::ServiceError;
use batcher::datatypes::{DatatypeKind, DatatypeRegistry};
use batcher::loader::{load_value, submission_path};
use batcher::preprocessing::apply_or_raw;
use batcher::preprocessing::script_transform::{DEFAULT_ENTRY_POINT, ScriptTransform};
use batcher::traits::transform::Transform;
use batcher::{BatchingJob, Candidate};
use db::models::{assignment, batch, batch_response, datatype, question, response};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use util::state::RebuildLocks;

/// Where response files live and how far a transform may run.
#[derive(Debug, Clone)]
pub struct BatchingSettings {
    pub submissions_root: PathBuf,
    pub max_operations: u64,
}

impl BatchingSettings {
    pub fn new(submissions_root: impl Into<PathBuf>, max_operations: u64) -> Self {
        Self {
            submissions_root: submissions_root.into(),
            max_operations,
        }
    }

    /// Settings taken from the global configuration.
    pub fn from_config() -> Self {
        Self::new(
            util::paths::submissions_root(),
            util::config::transform_max_operations(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeFailureView {
    pub response_id: i64,
    pub student_id: i64,
    pub reason: String,
}

/// Outcome of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub question_id: i64,
    pub batches: usize,
    pub responses: usize,
    /// Fingerprint of the preprocessing script used, if any.
    pub transform_version: Option<String>,
    pub decode_failures: Vec<DecodeFailureView>,
    pub transform_fallbacks: usize,
}

/// A batch as shown to a grader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchView {
    pub id: i64,
    pub grade: i64,
    pub comments: String,
    pub question_id: i64,
    pub assignment_id: i64,
    pub datatype: String,
    pub member_count: usize,
    /// Responses batched across all of the question's batches.
    pub total_responses: u64,
    /// The representative's data after preprocessing.
    pub data: String,
}

pub struct BatchingService;

impl BatchingService {
    async fn context(
        db: &DatabaseConnection,
        assignment_id: i64,
        question_id: i64,
    ) -> Result<(assignment::Model, question::Model), ServiceError> {
        let assignment = assignment::Model::get_by_id(db, assignment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment"))?;
        let question = question::Model::get_in_assignment(db, assignment_id, question_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Question"))?;
        Ok((assignment, question))
    }

    fn compile(
        question: &question::Model,
        max_operations: u64,
    ) -> Result<Option<ScriptTransform>, batcher::BatcherError> {
        question
            .preprocessing
            .as_deref()
            .filter(|source| !source.trim().is_empty())
            .map(|source| ScriptTransform::compile_with(source, DEFAULT_ENTRY_POINT, max_operations))
            .transpose()
    }

    fn response_path(
        settings: &BatchingSettings,
        registry: &DatatypeRegistry,
        assignment_name: &str,
        response: &response::Model,
    ) -> PathBuf {
        let extension = registry
            .by_id(response.datatype_id)
            .map(|d| d.extension.as_str())
            .unwrap_or_default();
        submission_path(
            &settings.submissions_root,
            assignment_name,
            response.student_id,
            &response.var_name,
            extension,
        )
    }

    /// Discard a question's batches and partition its responses again.
    ///
    /// Grades and comments of the old batches are lost.
    pub async fn rebuild(
        db: &DatabaseConnection,
        locks: &RebuildLocks,
        settings: &BatchingSettings,
        assignment_id: i64,
        question_id: i64,
    ) -> Result<RebuildReport, ServiceError> {
        let _guard = locks.acquire(question_id).await;

        let (assignment, question) = Self::context(db, assignment_id, question_id).await?;
        let transform = Self::compile(&question, settings.max_operations)?;
        let transform_version = transform.as_ref().map(|t| t.version().to_string());

        let registry = datatype::Model::registry(db).await?;
        let responses =
            response::Model::get_for_variable(db, assignment.id, &question.var_name).await?;
        let candidates: Vec<Candidate> = responses
            .iter()
            .map(|r| Candidate {
                response_id: r.id,
                student_id: r.student_id,
                datatype_id: r.datatype_id,
                path: Self::response_path(settings, &registry, &assignment.name, r),
            })
            .collect();

        let tolerance = question.tolerance;
        let partition = tokio::task::spawn_blocking(move || {
            let mut job = BatchingJob::new(&registry, tolerance);
            if let Some(t) = &transform {
                job = job.with_transform(t);
            }
            job.run(&candidates)
        })
        .await?;

        let txn = db.begin().await?;
        batch::Model::delete_for_question(&txn, question.id).await?;
        for planned in &partition.batches {
            let created = batch::Model::create(&txn, question.id, planned.datatype_id).await?;
            for (position, response_id) in planned.members.iter().enumerate() {
                batch_response::Model::create(&txn, created.id, *response_id, position as i64)
                    .await?;
            }
        }
        txn.commit().await?;

        let report = RebuildReport {
            question_id: question.id,
            batches: partition.batches.len(),
            responses: partition.response_count(),
            transform_version,
            decode_failures: partition
                .decode_failures
                .into_iter()
                .map(|f| DecodeFailureView {
                    response_id: f.response_id,
                    student_id: f.student_id,
                    reason: f.reason,
                })
                .collect(),
            transform_fallbacks: partition.transform_fallbacks,
        };

        info!(
            assignment_id,
            question_id,
            batches = report.batches,
            responses = report.responses,
            transform_version = report.transform_version.as_deref().unwrap_or("none"),
            "Rebuilt batches"
        );
        Ok(report)
    }

    fn render(
        settings: &BatchingSettings,
        registry: &DatatypeRegistry,
        assignment_name: &str,
        transform: Option<&dyn Transform>,
        representative: Option<&response::Model>,
    ) -> String {
        let Some(response) = representative else {
            return "<unavailable: batch has no members>".to_string();
        };
        let kind = registry
            .by_id(response.datatype_id)
            .and_then(|d| d.kind())
            .unwrap_or(DatatypeKind::Text);
        let path = Self::response_path(settings, registry, assignment_name, response);

        match load_value(&path, kind) {
            Ok(value) => apply_or_raw(transform, response.student_id, &value).to_string(),
            Err(e) => format!("<unavailable: {e}>"),
        }
    }

    async fn view(
        db: &DatabaseConnection,
        settings: &BatchingSettings,
        registry: &DatatypeRegistry,
        transform: Option<&dyn Transform>,
        assignment: &assignment::Model,
        model: batch::Model,
        total_responses: u64,
    ) -> Result<BatchView, ServiceError> {
        let member_count = batch_response::Model::count_for_batches(db, vec![model.id]).await?;
        let representative = match batch_response::Model::representative(db, model.id).await? {
            Some(link) => response::Model::get_by_id(db, link.response_id).await?,
            None => None,
        };

        Ok(BatchView {
            id: model.id,
            grade: model.grade,
            comments: model.comments,
            question_id: model.question_id,
            assignment_id: assignment.id,
            datatype: registry
                .by_id(model.datatype_id)
                .map(|d| d.name.clone())
                .unwrap_or_default(),
            member_count: member_count as usize,
            total_responses,
            data: Self::render(
                settings,
                registry,
                &assignment.name,
                transform,
                representative.as_ref(),
            ),
        })
    }

    fn view_transform(question: &question::Model, settings: &BatchingSettings) -> Option<ScriptTransform> {
        Self::compile(question, settings.max_operations).unwrap_or_else(|e| {
            warn!(question_id = question.id, "Showing raw data: {}", e);
            None
        })
    }

    /// Views of every batch of a question, in creation order.
    pub async fn list_batches(
        db: &DatabaseConnection,
        settings: &BatchingSettings,
        assignment_id: i64,
        question_id: i64,
    ) -> Result<Vec<BatchView>, ServiceError> {
        let (assignment, question) = Self::context(db, assignment_id, question_id).await?;
        let registry = datatype::Model::registry(db).await?;
        let transform = Self::view_transform(&question, settings);

        let batches = batch::Model::get_by_question_id(db, question.id).await?;
        let total =
            batch_response::Model::count_for_batches(db, batches.iter().map(|b| b.id).collect())
                .await?;

        let mut views = Vec::with_capacity(batches.len());
        for model in batches {
            views.push(
                Self::view(
                    db,
                    settings,
                    &registry,
                    transform.as_ref().map(|t| t as &dyn Transform),
                    &assignment,
                    model,
                    total,
                )
                .await?,
            );
        }
        Ok(views)
    }

    pub async fn get_batch(
        db: &DatabaseConnection,
        settings: &BatchingSettings,
        assignment_id: i64,
        question_id: i64,
        batch_id: i64,
    ) -> Result<BatchView, ServiceError> {
        let (assignment, question) = Self::context(db, assignment_id, question_id).await?;
        let model = batch::Model::get_in_question(db, question.id, batch_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch"))?;

        let registry = datatype::Model::registry(db).await?;
        let transform = Self::view_transform(&question, settings);
        let batch_ids = batch::Model::get_by_question_id(db, question.id)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();
        let total = batch_response::Model::count_for_batches(db, batch_ids).await?;

        Self::view(
            db,
            settings,
            &registry,
            transform.as_ref().map(|t| t as &dyn Transform),
            &assignment,
            model,
            total,
        )
        .await
    }

    /// Grade a batch. Every member inherits the grade and comments.
    pub async fn set_grade(
        db: &DatabaseConnection,
        assignment_id: i64,
        question_id: i64,
        batch_id: i64,
        grade: i64,
        comments: &str,
    ) -> Result<batch::Model, ServiceError> {
        let (_, question) = Self::context(db, assignment_id, question_id).await?;
        if batch::Model::get_in_question(db, question.id, batch_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Batch"));
        }
        if grade < 0 {
            return Err(ServiceError::Invalid("grade must not be negative".into()));
        }

        let updated = batch::Model::set_grade(db, batch_id, grade, comments).await?;
        info!(batch_id, grade, "Graded batch");
        Ok(updated)
    }
}
