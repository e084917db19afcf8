use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, IntoActiveModel, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Submission model representing the `submissions` table.
///
/// One row per student per assignment. The grade and feedback are informational copies of the
/// last export.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub grade: i64,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Record an ungraded submission.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            grade: Set(0),
            feedback: Set(String::new()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Submissions of an assignment, ordered by student id.
    pub async fn get_by_assignment_id<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::StudentId)
            .all(db)
            .await
    }

    pub async fn count_for_assignment(db: &DatabaseConnection, assignment_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .count(db)
            .await
    }

    pub async fn record_result<C: ConnectionTrait>(
        db: &C,
        id: i64,
        grade: i64,
        feedback: &str,
    ) -> Result<Self, DbErr> {
        let Some(submission) = Entity::find_by_id(id).one(db).await? else {
            return Err(DbErr::RecordNotFound("Submission not found".into()));
        };

        let mut active = submission.into_active_model();
        active.grade = Set(grade);
        active.feedback = Set(feedback.to_string());
        active.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{assignment, student};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_record_result() {
        let db = setup_test_db().await;
        let a = assignment::Model::create(&db, "hw1").await.unwrap();
        student::Model::ensure(&db, 20).await.unwrap();
        student::Model::ensure(&db, 10).await.unwrap();

        let s20 = Model::create(&db, a.id, 20).await.unwrap();
        Model::create(&db, a.id, 10).await.unwrap();
        assert_eq!(s20.grade, 0);
        assert_eq!(s20.feedback, "");

        let listed: Vec<i64> = Model::get_by_assignment_id(&db, a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.student_id)
            .collect();
        assert_eq!(listed, vec![10, 20]);
        assert_eq!(Model::count_for_assignment(&db, a.id).await.unwrap(), 2);

        let graded = Model::record_result(&db, s20.id, 12, "Q1\nGrade: 12/12\n").await.unwrap();
        assert_eq!(graded.grade, 12);
        assert!(Model::record_result(&db, 9999, 0, "").await.is_err());
    }
}
