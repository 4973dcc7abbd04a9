//! Indexes backing the ordered listings (`products.title`, `<table>.name`).
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn name_index(index: &str, table: &str, column: &str) -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(index)
        .table(Alias::new(table))
        .col(Alias::new(column))
        .to_owned()
}

const INDEXES: [(&str, &str, &str); 5] = [
    ("idx_products_title", "products", "title"),
    ("idx_suppliers_name", "suppliers", "name"),
    ("idx_tags_name", "tags", "name"),
    ("idx_categories_name", "categories", "name"),
    ("idx_salespeople_name", "salespeople", "name"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (index, table, column) in INDEXES {
            manager.create_index(name_index(index, table, column)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (index, table, _) in INDEXES {
            manager
                .drop_index(Index::drop().name(index).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
