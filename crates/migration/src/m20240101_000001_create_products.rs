//! Create `products` with the original column set.
//! Later columns are added by `m20240101_000004_add_product_columns` so that
//! databases created before they existed are widened the same way.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(string(Products::Id).primary_key())
                    .col(string(Products::Title))
                    .col(double(Products::Price))
                    .col(text_null(Products::Description))
                    .col(string_null(Products::Image))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    Price,
    Description,
    Image,
}
