use super::batch;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Question model representing the `questions` table.
///
/// A question grades the responses stored under `var_name`. `preprocessing` holds the optional
/// transform script applied before responses are compared.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub var_name: String,
    pub max_grade: i64,
    pub tolerance: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub preprocessing: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a new question in the database.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
        name: &str,
        var_name: &str,
        max_grade: i64,
        tolerance: f64,
        preprocessing: Option<&str>,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            assignment_id: Set(assignment_id),
            name: Set(name.to_string()),
            var_name: Set(var_name.to_string()),
            max_grade: Set(max_grade),
            tolerance: Set(tolerance),
            preprocessing: Set(preprocessing.map(str::to_string)),
            ..Default::default()
        };
        active.insert(db).await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Get a question only if it belongs to `assignment_id`.
    pub async fn get_in_assignment(
        db: &DatabaseConnection,
        assignment_id: i64,
        id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(db)
            .await
    }

    /// Get all questions of an assignment, in creation order.
    pub async fn get_by_assignment_id<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Delete a question with its batches. Returns `false` if it does not exist.
    pub async fn delete_cascade<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, DbErr> {
        if Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(false);
        }
        batch::Model::delete_for_question(db, id).await?;
        Entity::delete_by_id(id).exec(db).await?;
        Ok(true)
    }
}
