//! Create `suppliers`, `tags` and `categories`: identical `{id, name}` tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn named_table<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(string(Named::Id).primary_key())
        .col(string(Named::Name))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(named_table(Suppliers::Table)).await?;
        manager.create_table(named_table(Tags::Table)).await?;
        manager.create_table(named_table(Categories::Table)).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Categories::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Suppliers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Named {
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Suppliers { Table }

#[derive(DeriveIden)]
enum Tags { Table }

#[derive(DeriveIden)]
enum Categories { Table }
