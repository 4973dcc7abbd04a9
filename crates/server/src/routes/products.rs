use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    http::StatusCode,
    Json,
};
use models::catalog::{NewProduct, Product, ProductStatus, ProductUpdate};
use serde::Deserialize;

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// `published` or `archived`; omit for all products.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn parse_status(raw: &str) -> Result<ProductStatus, JsonApiError> {
    raw.parse::<ProductStatus>().map_err(|e| JsonApiError::bad_request(e.to_string()))
}

fn required_id(id: Option<String>) -> Result<String, JsonApiError> {
    id.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| JsonApiError::bad_request("id required"))
}

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    params(StatusQuery),
    responses(
        (status = 200, description = "Product list", body = [crate::openapi::ProductDoc]),
        (status = 400, description = "Invalid status")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, JsonApiError> {
    let Query(q) = query?;
    let status = match q.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    Ok(Json(state.catalog.products.list_by_status(status).await))
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Title or price missing or invalid"),
        (status = 500, description = "Storage not configured or write failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let Json(input) = body?;
    let product = state.catalog.products.add(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put, path = "/api/products", tag = "products",
    request_body = crate::openapi::ProductUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let Json(input) = body?;
    Ok(Json(state.catalog.products.update(input).await?))
}

#[utoipa::path(
    delete, path = "/api/products", tag = "products",
    params(IdQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Query(q) = query?;
    let id = required_id(q.id)?;
    if state.catalog.products.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found(format!("product {id} not found")))
    }
}

#[utoipa::path(
    post, path = "/api/products/toggle", tag = "products",
    request_body = crate::openapi::ToggleDoc,
    responses(
        (status = 200, description = "Status changed", body = crate::openapi::ProductDoc),
        (status = 400, description = "Missing id or invalid status"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn toggle(
    State(state): State<ServerState>,
    body: Result<Json<ToggleInput>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let Json(input) = body?;
    let id = required_id(input.id)?;
    let status = parse_status(input.status.as_deref().unwrap_or_default())?;
    match state.catalog.products.set_status(&id, status).await? {
        Some(product) => Ok(Json(product)),
        None => Err(JsonApiError::not_found(format!("product {id} not found"))),
    }
}
