use crate::error::ServiceError;
use crate::submission_service::{LoadReport, SubmissionService};
use db::models::{assignment, question, submission};
use sea_orm::{DatabaseConnection, DbErr, SqlErr, TransactionTrait};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub name: String,
}

/// An assignment with its derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentSummary {
    pub id: i64,
    pub name: String,
    /// Sum of the questions' maximum grades.
    pub total_points: i64,
    pub total_questions: usize,
    pub total_submissions: u64,
}

pub struct AssignmentService;

fn name_taken(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("An assignment named '{name}' already exists"))
}

/// A unique-constraint failure on insert means another request created the same name first.
fn map_create_error(name: &str, err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => name_taken(name),
        _ => ServiceError::Db(err),
    }
}

impl AssignmentService {
    async fn summarise(
        db: &DatabaseConnection,
        model: assignment::Model,
    ) -> Result<AssignmentSummary, ServiceError> {
        let questions = question::Model::get_by_assignment_id(db, model.id).await?;
        let total_submissions = submission::Model::count_for_assignment(db, model.id).await?;
        Ok(AssignmentSummary {
            id: model.id,
            name: model.name,
            total_points: questions.iter().map(|q| q.max_grade).sum(),
            total_questions: questions.len(),
            total_submissions,
        })
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<AssignmentSummary>, ServiceError> {
        let mut out = Vec::new();
        for model in assignment::Model::all(db).await? {
            out.push(Self::summarise(db, model).await?);
        }
        Ok(out)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> Result<AssignmentSummary, ServiceError> {
        let model = assignment::Model::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment"))?;
        Self::summarise(db, model).await
    }

    /// Create an assignment and load its submissions from `submissions_root`.
    ///
    /// Runs in one transaction: if loading fails, the assignment is not created.
    pub async fn create(
        db: &DatabaseConnection,
        params: CreateAssignment,
        submissions_root: &Path,
    ) -> Result<(AssignmentSummary, LoadReport), ServiceError> {
        let name = params.name.trim();
        if assignment::Model::get_by_name(db, name).await?.is_some() {
            return Err(name_taken(name));
        }

        let txn = db.begin().await?;
        let created = assignment::Model::create(&txn, name)
            .await
            .map_err(|e| map_create_error(name, e))?;
        let report =
            SubmissionService::load_submissions(&txn, created.id, &created.name, submissions_root)
                .await?;
        txn.commit().await?;

        info!(assignment_id = created.id, name = %created.name, "Created assignment");
        let summary = Self::summarise(db, created).await?;
        Ok((summary, report))
    }

    /// Delete an assignment and everything that belongs to it. Returns `false` if it did not exist.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
        let txn = db.begin().await?;
        let deleted = assignment::Model::delete_cascade(&txn, id).await?;
        txn.commit().await?;
        if deleted {
            info!(assignment_id = id, "Deleted assignment");
        }
        Ok(deleted)
    }
}
