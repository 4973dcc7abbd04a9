use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use service::services::{CatalogPage, CatalogQuery, SortKey};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Case-insensitive title search.
    pub q: Option<String>,
    /// Comma separated category ids.
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `relevance`, `price_asc`, `price_desc` or `title_asc`.
    pub sort: Option<String>,
}

impl From<CatalogParams> for CatalogQuery {
    fn from(p: CatalogParams) -> Self {
        let query = CatalogQuery {
            q: p.q,
            min_price: p.min_price,
            max_price: p.max_price,
            sort: p.sort.as_deref().map(SortKey::from_param).unwrap_or_default(),
            ..Default::default()
        };
        match p.category {
            Some(raw) => query.with_categories(&raw),
            None => query,
        }
    }
}

#[utoipa::path(
    get, path = "/api/catalog", tag = "catalog",
    params(CatalogParams),
    responses(
        (status = 200, description = "Published products with category counts and price bound", body = crate::openapi::CatalogPageDoc),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn browse(
    State(state): State<ServerState>,
    params: Result<Query<CatalogParams>, QueryRejection>,
) -> Result<Json<CatalogPage>, JsonApiError> {
    let Query(params) = params?;
    let query = CatalogQuery::from(params);
    Ok(Json(state.catalog.browse(&query).await))
}
