use super::batch_response;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, IntoActiveModel, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Batch model representing the `batches` table.
///
/// A batch groups equivalent responses to one question so they share a grade and comments.
/// Membership lives in `batch_responses`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    /// Copied from the representative response.
    pub datatype_id: i64,
    pub grade: i64,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::datatype::Entity",
        from = "Column::DatatypeId",
        to = "super::datatype::Column::Id"
    )]
    Datatype,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create an ungraded batch.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        question_id: i64,
        datatype_id: i64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            question_id: Set(question_id),
            datatype_id: Set(datatype_id),
            grade: Set(0),
            comments: Set(String::new()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Get a batch only if it belongs to `question_id`.
    pub async fn get_in_question(
        db: &DatabaseConnection,
        question_id: i64,
        id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::QuestionId.eq(question_id))
            .one(db)
            .await
    }

    /// Batches of a question in creation order.
    pub async fn get_by_question_id<C: ConnectionTrait>(
        db: &C,
        question_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::QuestionId.eq(question_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Batches of several questions, ordered by id.
    pub async fn get_by_question_ids<C: ConnectionTrait>(
        db: &C,
        question_ids: Vec<i64>,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::QuestionId.is_in(question_ids))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Set the grade and comments shared by every member of the batch.
    pub async fn set_grade(
        db: &DatabaseConnection,
        id: i64,
        grade: i64,
        comments: &str,
    ) -> Result<Self, DbErr> {
        let Some(batch) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Batch not found".into()));
        };

        let mut active = batch.into_active_model();
        active.grade = Set(grade);
        active.comments = Set(comments.to_string());
        active.update(db).await
    }

    /// Delete one batch and its membership rows. Returns `false` if it did not exist.
    pub async fn delete_cascade<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, DbErr> {
        batch_response::Entity::delete_many()
            .filter(batch_response::Column::BatchId.eq(id))
            .exec(db)
            .await?;
        let result = Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete every batch of a question together with its membership rows.
    ///
    /// Returns the number of batches removed.
    pub async fn delete_for_question<C: ConnectionTrait>(
        db: &C,
        question_id: i64,
    ) -> Result<u64, DbErr> {
        let batch_ids: Vec<i64> = Self::get_by_question_id(db, question_id)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();
        if batch_ids.is_empty() {
            return Ok(0);
        }

        batch_response::Entity::delete_many()
            .filter(batch_response::Column::BatchId.is_in(batch_ids))
            .exec(db)
            .await?;
        let result = Entity::delete_many()
            .filter(Column::QuestionId.eq(question_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{assignment, question, response, student, BatchResponse};
    use crate::test_utils::setup_test_db;

    async fn question_fixture(db: &DatabaseConnection) -> question::Model {
        let a = assignment::Model::create(db, "hw1").await.unwrap();
        question::Model::create(db, a.id, "Q1", "x", 10, 0.001, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let db = setup_test_db().await;
        let q = question_fixture(&db).await;

        let b = Model::create(&db, q.id, 2).await.unwrap();
        assert_eq!(b.grade, 0);
        assert_eq!(b.comments, "");
        assert_eq!(b.datatype_id, 2);
        assert!(Model::get_in_question(&db, q.id, b.id).await.unwrap().is_some());
        assert!(Model::get_in_question(&db, q.id + 1, b.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_grade() {
        let db = setup_test_db().await;
        let q = question_fixture(&db).await;
        let b = Model::create(&db, q.id, 1).await.unwrap();

        let updated = Model::set_grade(&db, b.id, 7, "nearly").await.unwrap();
        assert_eq!(updated.grade, 7);
        assert_eq!(updated.comments, "nearly");

        match Model::set_grade(&db, 9999, 1, "").await {
            Err(DbErr::RecordNotFound(_)) => {}
            other => panic!("Expected RecordNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_for_question() {
        let db = setup_test_db().await;
        let q = question_fixture(&db).await;
        student::Model::ensure(&db, 1).await.unwrap();
        let r = response::Model::create(&db, q.assignment_id, 1, "x", 1).await.unwrap();

        let b1 = Model::create(&db, q.id, 1).await.unwrap();
        Model::create(&db, q.id, 1).await.unwrap();
        batch_response::Model::create(&db, b1.id, r.id, 0).await.unwrap();

        assert_eq!(Model::delete_for_question(&db, q.id).await.unwrap(), 2);
        assert_eq!(Model::delete_for_question(&db, q.id).await.unwrap(), 0);
        assert!(Model::get_by_question_id(&db, q.id).await.unwrap().is_empty());
        assert_eq!(BatchResponse::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascade_keeps_other_batches() {
        let db = setup_test_db().await;
        let q = question_fixture(&db).await;
        student::Model::ensure(&db, 1).await.unwrap();
        let r1 = response::Model::create(&db, q.assignment_id, 1, "x", 1).await.unwrap();
        let r2 = response::Model::create(&db, q.assignment_id, 1, "x", 1).await.unwrap();

        let b1 = Model::create(&db, q.id, 1).await.unwrap();
        let b2 = Model::create(&db, q.id, 1).await.unwrap();
        batch_response::Model::create(&db, b1.id, r1.id, 0).await.unwrap();
        batch_response::Model::create(&db, b2.id, r2.id, 0).await.unwrap();

        assert!(Model::delete_cascade(&db, b1.id).await.unwrap());
        assert!(!Model::delete_cascade(&db, b1.id).await.unwrap());

        let left = Model::get_by_question_id(&db, q.id).await.unwrap();
        assert_eq!(left, vec![b2.clone()]);
        assert_eq!(batch_response::Model::get_for_batches(&db, vec![b2.id]).await.unwrap().len(), 1);
        assert_eq!(BatchResponse::find().count(&db).await.unwrap(), 1);
    }
}
