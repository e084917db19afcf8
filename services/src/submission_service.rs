use crate::error::ServiceError;
use batcher::discovery::discover_submissions;
use db::models::{datatype, response, student, submission};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What a submission load created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub students: usize,
    pub responses: usize,
}

pub struct SubmissionService;

impl SubmissionService {
    /// Scan `<submissions_root>/<assignment_name>/` and record every student and response found.
    ///
    /// Students are upserted; one submission per student and one response per file are created,
    /// in ascending (student id, file name) order.
    pub async fn load_submissions<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
        assignment_name: &str,
        submissions_root: &Path,
    ) -> Result<LoadReport, ServiceError> {
        let registry = datatype::Model::registry(db).await?;
        let discovered = discover_submissions(submissions_root, assignment_name, &registry)?;

        let mut report = LoadReport::default();
        for found in &discovered {
            student::Model::ensure(db, found.student_id).await?;
            submission::Model::create(db, assignment_id, found.student_id).await?;
            report.students += 1;

            for file in &found.responses {
                response::Model::create(
                    db,
                    assignment_id,
                    found.student_id,
                    &file.var_name,
                    file.datatype_id,
                )
                .await?;
                report.responses += 1;
            }
        }

        info!(
            assignment = assignment_name,
            students = report.students,
            responses = report.responses,
            "Loaded submissions"
        );
        Ok(report)
    }
}
