use sea_orm::sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, Table,
    TableCreateStatement,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};

use crate::entity::{accounts, phone_numbers};
use crate::errors::from_db;
use phone_registry_domain::storage::StorageResult;

/// Creates the tables if they are missing. Existing tables are left as-is.
pub async fn run_migrations(db: &DatabaseConnection) -> StorageResult<()> {
    let backend = db.get_database_backend();

    let accounts_table = Table::create()
        .table(accounts::Entity)
        .col(
            ColumnDef::new(accounts::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(accounts::Column::Name).string().null())
        .col(
            ColumnDef::new(accounts::Column::Status)
                .integer()
                .not_null()
                .default(0),
        )
        .to_owned();
    create_table(db, backend, accounts_table).await?;

    let phone_numbers_table = Table::create()
        .table(phone_numbers::Entity)
        .col(
            ColumnDef::new(phone_numbers::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(phone_numbers::Column::Number)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(phone_numbers::Column::AccountId)
                .integer()
                .null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_phone_numbers_account_id")
                .from(phone_numbers::Entity, phone_numbers::Column::AccountId)
                .to(accounts::Entity, accounts::Column::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned();
    create_table(db, backend, phone_numbers_table).await?;

    let account_index = Index::create()
        .name("idx_phone_numbers_account_id")
        .table(phone_numbers::Entity)
        .col(phone_numbers::Column::AccountId)
        .to_owned();
    create_index(db, backend, account_index).await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    backend: DatabaseBackend,
    mut statement: TableCreateStatement,
) -> StorageResult<()> {
    statement.if_not_exists();
    db.execute(backend.build(&statement))
        .await
        .map_err(from_db)?;
    Ok(())
}

async fn create_index(
    db: &DatabaseConnection,
    backend: DatabaseBackend,
    mut statement: IndexCreateStatement,
) -> StorageResult<()> {
    statement.if_not_exists();
    db.execute(backend.build(&statement))
        .await
        .map_err(from_db)?;
    Ok(())
}
