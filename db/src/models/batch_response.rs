use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Batch membership, representing the `batch_responses` table.
///
/// `position` is the order in which a response joined its batch; position 0 is the representative.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub batch_id: i64,
    pub response_id: i64,
    pub position: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "super::response::Entity",
        from = "Column::ResponseId",
        to = "super::response::Column::Id"
    )]
    Response,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        batch_id: i64,
        response_id: i64,
        position: i64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            batch_id: Set(batch_id),
            response_id: Set(response_id),
            position: Set(position),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// The member at the lowest position, i.e. the batch's representative.
    pub async fn representative<C: ConnectionTrait>(
        db: &C,
        batch_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::BatchId.eq(batch_id))
            .order_by_asc(Column::Position)
            .one(db)
            .await
    }

    /// Membership rows of several batches, grouped by batch and in position order.
    pub async fn get_for_batches<C: ConnectionTrait>(
        db: &C,
        batch_ids: Vec<i64>,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::BatchId.is_in(batch_ids))
            .order_by_asc(Column::BatchId)
            .order_by_asc(Column::Position)
            .all(db)
            .await
    }

    pub async fn count_for_batches<C: ConnectionTrait>(
        db: &C,
        batch_ids: Vec<i64>,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::BatchId.is_in(batch_ids))
            .count(db)
            .await
    }
}
