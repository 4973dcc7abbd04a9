use sea_orm::{entity::prelude::*, Set};

use crate::catalog::{Product, ProductStatus, PLACEHOLDER_IMAGE};

/// Row layout of the `products` table. Tag ids are kept comma-joined in `tag_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub price: f64,
    pub price_pcs: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub supplier_id: Option<String>,
    pub tag_id: Option<String>,
    pub category_id: Option<String>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn join_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() { None } else { Some(tags.join(",")) }
}

pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            tag_ids: split_tags(m.tag_id.as_deref()),
            status: m.status.parse().unwrap_or(ProductStatus::Published),
            image: m.image.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            id: m.id,
            title: m.title,
            price: m.price,
            pcs_price: m.price_pcs,
            description: m.description,
            supplier_id: m.supplier_id,
            category_id: m.category_id,
        }
    }
}

impl From<&Product> for ActiveModel {
    fn from(p: &Product) -> Self {
        ActiveModel {
            id: Set(p.id.clone()),
            title: Set(p.title.clone()),
            price: Set(p.price),
            price_pcs: Set(p.pcs_price),
            description: Set(p.description.clone()),
            image: Set(Some(p.image.clone())),
            supplier_id: Set(p.supplier_id.clone()),
            tag_id: Set(join_tags(&p.tag_ids)),
            category_id: Set(p.category_id.clone()),
            status: Set(p.status.as_str().to_string()),
        }
    }
}
