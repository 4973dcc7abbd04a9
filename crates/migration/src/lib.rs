//! Catalog schema, applied idempotently by the relational backend on first use.
//! Tables are only ever created or widened; nothing here drops data on `up`.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_products;
mod m20240101_000002_create_taxonomy;
mod m20240101_000003_create_salespeople;
mod m20240101_000004_add_product_columns;
mod m20240101_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products::Migration),
            Box::new(m20240101_000002_create_taxonomy::Migration),
            Box::new(m20240101_000003_create_salespeople::Migration),
            Box::new(m20240101_000004_add_product_columns::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000005_add_indexes::Migration),
        ]
    }
}
