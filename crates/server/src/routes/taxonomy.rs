//! Suppliers, tags and categories: list and add-by-name.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use models::catalog::NamedEntity;
use serde::Deserialize;
use service::services::NamedEntityService;
use service::storage::Insertion;

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct NameInput {
    #[serde(default)]
    pub name: String,
}

async fn add_named(
    svc: &NamedEntityService,
    body: Result<Json<NameInput>, JsonRejection>,
) -> Result<(StatusCode, Json<NamedEntity>), JsonApiError> {
    let Json(input) = body?;
    match svc.add(&input.name).await? {
        Insertion::Created(e) => Ok((StatusCode::CREATED, Json(e))),
        Insertion::Existing(e) => Ok((StatusCode::OK, Json(e))),
    }
}

#[utoipa::path(get, path = "/api/suppliers", tag = "taxonomy",
    responses((status = 200, description = "Suppliers", body = [crate::openapi::NamedEntityDoc])))]
pub async fn list_suppliers(State(state): State<ServerState>) -> Json<Vec<NamedEntity>> {
    Json(state.catalog.suppliers.get_all().await)
}

#[utoipa::path(post, path = "/api/suppliers", tag = "taxonomy",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::NamedEntityDoc),
        (status = 200, description = "Name already present; existing supplier returned"),
        (status = 400, description = "Name missing")
    ))]
pub async fn create_supplier(
    State(state): State<ServerState>,
    body: Result<Json<NameInput>, JsonRejection>,
) -> Result<(StatusCode, Json<NamedEntity>), JsonApiError> {
    add_named(&state.catalog.suppliers, body).await
}

#[utoipa::path(get, path = "/api/tags", tag = "taxonomy",
    responses((status = 200, description = "Tags", body = [crate::openapi::NamedEntityDoc])))]
pub async fn list_tags(State(state): State<ServerState>) -> Json<Vec<NamedEntity>> {
    Json(state.catalog.tags.get_all().await)
}

#[utoipa::path(post, path = "/api/tags", tag = "taxonomy",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::NamedEntityDoc),
        (status = 200, description = "Name already present; existing tag returned"),
        (status = 400, description = "Name missing")
    ))]
pub async fn create_tag(
    State(state): State<ServerState>,
    body: Result<Json<NameInput>, JsonRejection>,
) -> Result<(StatusCode, Json<NamedEntity>), JsonApiError> {
    add_named(&state.catalog.tags, body).await
}

#[utoipa::path(get, path = "/api/categories", tag = "taxonomy",
    responses((status = 200, description = "Categories", body = [crate::openapi::NamedEntityDoc])))]
pub async fn list_categories(State(state): State<ServerState>) -> Json<Vec<NamedEntity>> {
    Json(state.catalog.categories.get_all().await)
}

#[utoipa::path(post, path = "/api/categories", tag = "taxonomy",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::NamedEntityDoc),
        (status = 200, description = "Name already present; existing category returned"),
        (status = 400, description = "Name missing")
    ))]
pub async fn create_category(
    State(state): State<ServerState>,
    body: Result<Json<NameInput>, JsonRejection>,
) -> Result<(StatusCode, Json<NamedEntity>), JsonApiError> {
    add_named(&state.catalog.categories, body).await
}
