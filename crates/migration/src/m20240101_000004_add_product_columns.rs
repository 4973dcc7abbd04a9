//! Widen `products` with pricing, link and status columns.
//!
//! Each column is added only when missing, so this also upgrades tables that
//! were created outside the migrator.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let wanted: Vec<(&str, ColumnDef)> = vec![
            ("price_pcs", double_null(Products::PricePcs)),
            ("supplier_id", string_null(Products::SupplierId)),
            ("tag_id", text_null(Products::TagId)),
            ("category_id", string_null(Products::CategoryId)),
            ("status", string(Products::Status).default("published").to_owned()),
        ];
        for (name, mut def) in wanted {
            if manager.has_column("products", name).await? {
                continue;
            }
            manager
                .alter_table(Table::alter().table(Products::Table).add_column(&mut def).to_owned())
                .await?;
        }
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // additive only; columns are left in place
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    PricePcs,
    SupplierId,
    TagId,
    CategoryId,
    Status,
}
