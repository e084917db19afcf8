use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Response model representing the `responses` table.
///
/// Only the location of the data is stored; the value itself is read from
/// `submissions/<assignment>/<student_id>/<var_name>.<extension>` when needed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub var_name: String,
    pub datatype_id: i64,
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
    #[sea_orm(
        belongs_to = "super::datatype::Entity",
        from = "Column::DatatypeId",
        to = "super::datatype::Column::Id"
    )]
    Datatype,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
        student_id: i64,
        var_name: &str,
        datatype_id: i64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            var_name: Set(var_name.to_string()),
            datatype_id: Set(datatype_id),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Responses to one variable of an assignment, in ascending id (discovery) order.
    pub async fn get_for_variable<C: ConnectionTrait>(
        db: &C,
        assignment_id: i64,
        var_name: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::VarName.eq(var_name))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn get_by_ids<C: ConnectionTrait>(db: &C, ids: Vec<i64>) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::Id.is_in(ids))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
