use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// Student model representing the `students` table. Ids are roster numbers, not generated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Insert the student if it is not already known.
    pub async fn ensure<C: ConnectionTrait>(db: &C, id: i64) -> Result<Self, DbErr> {
        if let Some(existing) = Entity::find_by_id(id).one(db).await? {
            return Ok(existing);
        }
        ActiveModel { id: Set(id) }.insert(db).await
    }
}
