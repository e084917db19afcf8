use batcher::datatypes::{DEFAULT_DATATYPES, DatatypeRegistry};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Datatype model representing the `datatypes` table. Rows are seeded once and never edited.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datatypes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub extension: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Insert any built-in datatype that is missing. Returns how many rows were added.
    pub async fn seed_defaults<C: ConnectionTrait>(db: &C) -> Result<usize, DbErr> {
        let mut added = 0;
        for (id, name, extension) in DEFAULT_DATATYPES {
            if Entity::find_by_id(id).one(db).await?.is_some() {
                continue;
            }
            ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                extension: Set(extension.to_string()),
            }
            .insert(db)
            .await?;
            added += 1;
        }
        Ok(added)
    }

    /// Build the in-memory registry from the stored rows.
    pub async fn registry<C: ConnectionTrait>(db: &C) -> Result<DatatypeRegistry, DbErr> {
        let rows = Self::all(db).await?;
        Ok(DatatypeRegistry::new(rows.into_iter().map(|row| {
            batcher::datatypes::Datatype::new(row.id, row.name, row.extension)
        })))
    }
}
