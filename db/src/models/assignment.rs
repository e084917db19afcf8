use super::{batch, batch_response, question, response, submission};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Assignment model representing the `assignments` table.
///
/// The name doubles as the directory name under `submissions/`, `grades/` and `feedback/`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Self, DbErr> {
        ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Self>, DbErr> {
        Entity::find().filter(Column::Name.eq(name)).one(db).await
    }

    pub async fn all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    /// Delete an assignment with its questions (and their batches), responses and submissions.
    ///
    /// Returns `false` if the assignment does not exist.
    pub async fn delete_cascade<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, DbErr> {
        if Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(false);
        }

        let question_ids: Vec<i64> = question::Entity::find()
            .filter(question::Column::AssignmentId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();
        for question_id in question_ids {
            batch::Model::delete_for_question(db, question_id).await?;
        }
        question::Entity::delete_many()
            .filter(question::Column::AssignmentId.eq(id))
            .exec(db)
            .await?;

        let response_ids: Vec<i64> = response::Entity::find()
            .filter(response::Column::AssignmentId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        batch_response::Entity::delete_many()
            .filter(batch_response::Column::ResponseId.is_in(response_ids))
            .exec(db)
            .await?;
        response::Entity::delete_many()
            .filter(response::Column::AssignmentId.eq(id))
            .exec(db)
            .await?;

        submission::Entity::delete_many()
            .filter(submission::Column::AssignmentId.eq(id))
            .exec(db)
            .await?;

        Entity::delete_by_id(id).exec(db).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{student, Batch, BatchResponse, Question, Response, Submission};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_assignment_create_and_find() {
        let db = setup_test_db().await;

        let created = Model::create(&db, "hw1").await.unwrap();
        assert_eq!(created.name, "hw1");

        let by_id = Model::get_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);
        let by_name = Model::get_by_name(&db, "hw1").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert!(Model::get_by_name(&db, "hw2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assignment_name_is_unique() {
        let db = setup_test_db().await;
        Model::create(&db, "hw1").await.unwrap();
        assert!(Model::create(&db, "hw1").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_cascade() {
        let db = setup_test_db().await;
        let hw1 = Model::create(&db, "hw1").await.unwrap();
        let hw2 = Model::create(&db, "hw2").await.unwrap();
        student::Model::ensure(&db, 1).await.unwrap();

        for assignment in [&hw1, &hw2] {
            let q = question::Model::create(&db, assignment.id, "Q1", "x", 5, 0.001, None)
                .await
                .unwrap();
            let r = response::Model::create(&db, assignment.id, 1, "x", 1).await.unwrap();
            let b = batch::Model::create(&db, q.id, 1).await.unwrap();
            batch_response::Model::create(&db, b.id, r.id, 0).await.unwrap();
            submission::Model::create(&db, assignment.id, 1).await.unwrap();
        }

        assert!(Model::delete_cascade(&db, hw1.id).await.unwrap());
        assert!(!Model::delete_cascade(&db, hw1.id).await.unwrap());

        assert!(Model::get_by_id(&db, hw1.id).await.unwrap().is_none());
        assert_eq!(Question::find().count(&db).await.unwrap(), 1);
        assert_eq!(Response::find().count(&db).await.unwrap(), 1);
        assert_eq!(Batch::find().count(&db).await.unwrap(), 1);
        assert_eq!(BatchResponse::find().count(&db).await.unwrap(), 1);
        assert_eq!(Submission::find().count(&db).await.unwrap(), 1);
        assert!(student::Model::get_by_id(&db, 1).await.unwrap().is_some());
    }
}
