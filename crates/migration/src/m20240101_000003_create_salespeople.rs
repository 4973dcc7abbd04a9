//! Create `salespeople`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Salespeople::Table)
                    .if_not_exists()
                    .col(string(Salespeople::Id).primary_key())
                    .col(string(Salespeople::Name))
                    .col(string(Salespeople::Phone))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Salespeople::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Salespeople {
    Table,
    Id,
    Name,
    Phone,
}
