//! Schema bootstrap.
//!
//! Tables are created straight from the entity definitions, parents before children, and are left
//! alone if they already exist. The datatype table is then seeded with the built-in datatypes.

use crate::models::{
    assignment, batch, batch_response, datatype, question, response, student, submission,
};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}

/// Create every table that does not exist yet.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, datatype::Entity).await?;
    create_table(db, &schema, student::Entity).await?;
    create_table(db, &schema, assignment::Entity).await?;
    create_table(db, &schema, question::Entity).await?;
    create_table(db, &schema, response::Entity).await?;
    create_table(db, &schema, submission::Entity).await?;
    create_table(db, &schema, batch::Entity).await?;
    create_table(db, &schema, batch_response::Entity).await?;

    Ok(())
}

/// Create the tables and seed the built-in datatypes.
pub async fn init<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_tables(db).await?;
    let seeded = datatype::Model::seed_defaults(db).await?;
    tracing::info!(seeded, "Database schema ready");
    Ok(())
}
