use crate::error::ServiceError;
use batcher::export::{
    ExportSink, FsExportSink, GradeEntry, GradeSheet, QuestionColumn, export, feedback_for, pivot,
};
use db::models::{assignment, batch, batch_response, question, response, submission};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Result of saving an assignment's grades.
#[derive(Debug, Clone, Serialize)]
pub struct GradeExport {
    pub assignment_id: i64,
    pub students: usize,
    pub questions: usize,
    pub sheet: GradeSheet,
}

pub struct GradeService;

impl GradeService {
    /// Collect the grades every student inherits from the batches their responses are in.
    pub async fn grade_sheet(
        db: &DatabaseConnection,
        assignment_id: i64,
    ) -> Result<GradeSheet, ServiceError> {
        if assignment::Model::get_by_id(db, assignment_id).await?.is_none() {
            return Err(ServiceError::not_found("Assignment"));
        }

        let questions = question::Model::get_by_assignment_id(db, assignment_id).await?;
        let columns: Vec<QuestionColumn> = questions
            .iter()
            .map(|q| QuestionColumn {
                question_id: q.id,
                name: q.name.clone(),
                max_grade: q.max_grade,
            })
            .collect();

        let batches: HashMap<i64, batch::Model> =
            batch::Model::get_by_question_ids(db, questions.iter().map(|q| q.id).collect())
                .await?
                .into_iter()
                .map(|b| (b.id, b))
                .collect();
        let links =
            batch_response::Model::get_for_batches(db, batches.keys().copied().collect()).await?;
        let owners: HashMap<i64, i64> =
            response::Model::get_by_ids(db, links.iter().map(|l| l.response_id).collect())
                .await?
                .into_iter()
                .map(|r| (r.id, r.student_id))
                .collect();

        let entries: Vec<GradeEntry> = links
            .iter()
            .filter_map(|link| {
                let batch = batches.get(&link.batch_id)?;
                let student_id = *owners.get(&link.response_id)?;
                Some(GradeEntry {
                    student_id,
                    question_id: batch.question_id,
                    grade: batch.grade,
                    comments: batch.comments.clone(),
                })
            })
            .collect();

        let roster: Vec<i64> = submission::Model::get_by_assignment_id(db, assignment_id)
            .await?
            .into_iter()
            .map(|s| s.student_id)
            .collect();

        Ok(pivot(&columns, &entries, &roster)?)
    }

    /// Write the grades table and feedback documents through `sink`, then copy each student's
    /// total and feedback onto their submission.
    ///
    /// The sink runs on the blocking thread pool.
    pub async fn save_grades<S>(
        db: &DatabaseConnection,
        assignment_id: i64,
        sink: Arc<S>,
    ) -> Result<GradeExport, ServiceError>
    where
        S: ExportSink + Send + Sync + 'static,
    {
        let model = assignment::Model::get_by_id(db, assignment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment"))?;
        let sheet = Self::grade_sheet(db, assignment_id).await?;

        let name = model.name.clone();
        let sheet = tokio::task::spawn_blocking(move || {
            export(sink.as_ref(), &name, &sheet).map(|_| sheet)
        })
        .await??;

        let rows: HashMap<i64, usize> = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.student_id, i))
            .collect();
        let txn = db.begin().await?;
        for sub in submission::Model::get_by_assignment_id(&txn, assignment_id).await? {
            if let Some(&i) = rows.get(&sub.student_id) {
                let row = &sheet.rows[i];
                submission::Model::record_result(&txn, sub.id, row.total(), &feedback_for(&sheet, row))
                    .await?;
            }
        }
        txn.commit().await?;

        info!(
            assignment_id,
            students = sheet.rows.len(),
            questions = sheet.columns.len(),
            "Saved grades"
        );
        Ok(GradeExport {
            assignment_id,
            students: sheet.rows.len(),
            questions: sheet.columns.len(),
            sheet,
        })
    }

    /// [`save_grades`](Self::save_grades) into the configured `grades/` and `feedback/` roots.
    pub async fn save_grades_to_storage(
        db: &DatabaseConnection,
        assignment_id: i64,
    ) -> Result<GradeExport, ServiceError> {
        let sink = FsExportSink::new(util::paths::grades_root(), util::paths::feedback_root());
        Self::save_grades(db, assignment_id, Arc::new(sink)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment_service::{AssignmentService, CreateAssignment};
    use crate::batching_service::{BatchingService, BatchingSettings};
    use crate::test_support::write_file;
    use batcher::export::MISSING_RESPONSE_COMMENT;
    use db::test_utils::setup_test_db;
    use std::fs;
    use tempfile::tempdir;
    use util::state::RebuildLocks;

    #[tokio::test]
    async fn test_save_grades_end_to_end() {
        let db = setup_test_db().await;
        let dir = tempdir().unwrap();
        write_file(dir.path(), "submissions/hw1/1/x.csv", "1.0");
        write_file(dir.path(), "submissions/hw1/2/x.csv", "1.0004");
        write_file(dir.path(), "submissions/hw1/2/y.txt", "yes");
        write_file(dir.path(), "submissions/hw1/3/y.txt", "no");

        let (a, _) = AssignmentService::create(
            &db,
            CreateAssignment { name: "hw1".into() },
            &dir.path().join("submissions"),
        )
        .await
        .unwrap();
        let qx = question::Model::create(&db, a.id, "Part A", "x", 10, 0.001, None).await.unwrap();
        let qy = question::Model::create(&db, a.id, "Part B", "y", 5, 0.001, None).await.unwrap();

        let settings = BatchingSettings::new(dir.path().join("submissions"), 10_000);
        let locks = RebuildLocks::new();
        for q in [&qx, &qy] {
            BatchingService::rebuild(&db, &locks, &settings, a.id, q.id).await.unwrap();
        }
        for b in batch::Model::get_by_question_id(&db, qx.id).await.unwrap() {
            batch::Model::set_grade(&db, b.id, 10, "correct").await.unwrap();
        }
        let y_batches = batch::Model::get_by_question_id(&db, qy.id).await.unwrap();
        batch::Model::set_grade(&db, y_batches[0].id, 5, "yes is right").await.unwrap();

        let sink = Arc::new(FsExportSink::new(
            dir.path().join("grades"),
            dir.path().join("feedback"),
        ));
        let result = GradeService::save_grades(&db, a.id, sink.clone()).await.unwrap();
        assert_eq!(result.students, 3);
        assert_eq!(result.questions, 2);

        let table = fs::read_to_string(sink.grades_path("hw1")).unwrap();
        assert_eq!(
            table,
            "Student ID,Part A,Part B,Total\n1,10,0,10\n2,10,5,15\n3,0,0,0\n"
        );

        let feedback = fs::read_to_string(sink.feedback_path("hw1", 1)).unwrap();
        assert_eq!(
            feedback,
            format!(
                "Part A\nGrade: 10/10\nComments: correct\nPart B\nGrade: 0/5\nComments: {MISSING_RESPONSE_COMMENT}\n"
            )
        );

        let subs = submission::Model::get_by_assignment_id(&db, a.id).await.unwrap();
        let totals: Vec<i64> = subs.iter().map(|s| s.grade).collect();
        assert_eq!(totals, vec![10, 15, 0]);
        assert!(subs[1].feedback.contains("yes is right"));
    }

    /// Records which thread wrote the grades table.
    #[derive(Default)]
    struct ThreadRecordingSink {
        writer: std::sync::Mutex<Option<std::thread::ThreadId>>,
    }

    impl ExportSink for ThreadRecordingSink {
        fn clear_feedback(&self, _: &str) -> Result<(), batcher::BatcherError> {
            Ok(())
        }

        fn write_grades(&self, _: &str, _: &GradeSheet) -> Result<(), batcher::BatcherError> {
            *self.writer.lock().unwrap() = Some(std::thread::current().id());
            Ok(())
        }

        fn write_feedback(&self, _: &str, _: i64, _: &str) -> Result<(), batcher::BatcherError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_export_runs_off_the_runtime_thread() {
        let db = setup_test_db().await;
        let a = assignment::Model::create(&db, "hw1").await.unwrap();

        let sink = Arc::new(ThreadRecordingSink::default());
        GradeService::save_grades(&db, a.id, sink.clone()).await.unwrap();

        let writer = sink.writer.lock().unwrap().expect("grades were not written");
        assert_ne!(writer, std::thread::current().id());
    }

    #[tokio::test]
    async fn test_duplicate_variable_is_an_error() {
        let db = setup_test_db().await;
        let dir = tempdir().unwrap();
        write_file(dir.path(), "hw1/1/x.csv", "1");
        write_file(dir.path(), "hw1/1/x.txt", "1");

        let (a, _) = AssignmentService::create(&db, CreateAssignment { name: "hw1".into() }, dir.path())
            .await
            .unwrap();
        let q = question::Model::create(&db, a.id, "Q", "x", 1, 0.001, None).await.unwrap();
        let settings = BatchingSettings::new(dir.path(), 10_000);
        BatchingService::rebuild(&db, &RebuildLocks::new(), &settings, a.id, q.id)
            .await
            .unwrap();

        assert!(matches!(
            GradeService::grade_sheet(&db, a.id).await,
            Err(ServiceError::Batcher(batcher::BatcherError::DuplicateEntry { .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_assignment() {
        let db = setup_test_db().await;
        assert!(matches!(
            GradeService::grade_sheet(&db, 5).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
