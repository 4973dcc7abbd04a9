//! OpenAPI document. The wire types live in `models`, which stays free of
//! HTTP concerns, so their schemas are mirrored here.

use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: String,
    pub title: String,
    /// Carton price.
    pub price: f64,
    /// Per-piece price.
    pub pcs_price: Option<f64>,
    pub description: Option<String>,
    pub image: String,
    pub supplier_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub category_id: Option<String>,
    /// `published` or `archived`.
    pub status: String,
}

/// Prices may be sent as numbers or numeric text.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductInputDoc {
    pub title: String,
    pub price: String,
    pub pcs_price: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub supplier_id: Option<String>,
    pub tag_id: Option<String>,
    pub tag_ids: Option<Vec<String>>,
    pub category_id: Option<String>,
    pub status: Option<String>,
}

/// Same fields as a new product plus the `id` to replace.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductUpdateDoc {
    pub id: String,
    pub title: String,
    pub price: String,
    pub pcs_price: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub supplier_id: Option<String>,
    pub tag_ids: Option<Vec<String>>,
    pub category_id: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct ToggleDoc {
    pub id: String,
    pub status: String,
}

#[derive(ToSchema)]
pub struct NamedEntityDoc {
    pub id: String,
    pub name: String,
}

#[derive(ToSchema)]
pub struct NameInputDoc {
    pub name: String,
}

#[derive(ToSchema)]
pub struct SalespersonDoc {
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[derive(ToSchema)]
pub struct SalespersonInputDoc {
    pub name: String,
    pub phone: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CatalogPageDoc {
    pub products: Vec<ProductDoc>,
    pub total: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub max_price: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::products::toggle,
        crate::routes::taxonomy::list_suppliers,
        crate::routes::taxonomy::create_supplier,
        crate::routes::taxonomy::list_tags,
        crate::routes::taxonomy::create_tag,
        crate::routes::taxonomy::list_categories,
        crate::routes::taxonomy::create_category,
        crate::routes::sales::list,
        crate::routes::sales::create,
        crate::routes::sales::seed,
        crate::routes::catalog::browse,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ProductInputDoc,
            ProductUpdateDoc,
            ToggleDoc,
            NamedEntityDoc,
            NameInputDoc,
            SalespersonDoc,
            SalespersonInputDoc,
            CatalogPageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "taxonomy"),
        (name = "sales"),
        (name = "catalog")
    )
)]
pub struct ApiDoc;
