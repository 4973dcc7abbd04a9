use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use models::catalog::Salesperson;
use serde::Deserialize;
use service::storage::Insertion;

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct SalespersonInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[utoipa::path(get, path = "/api/sales", tag = "sales",
    responses((status = 200, description = "Salespeople", body = [crate::openapi::SalespersonDoc])))]
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Salesperson>> {
    Json(state.catalog.salespeople.get_all().await)
}

#[utoipa::path(post, path = "/api/sales", tag = "sales",
    request_body = crate::openapi::SalespersonInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SalespersonDoc),
        (status = 200, description = "Name or phone already present; existing record returned"),
        (status = 400, description = "Name or phone missing")
    ))]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<SalespersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Salesperson>), JsonApiError> {
    let Json(input) = body?;
    match state.catalog.salespeople.add(&input.name, &input.phone).await? {
        Insertion::Created(s) => Ok((StatusCode::CREATED, Json(s))),
        Insertion::Existing(s) => Ok((StatusCode::OK, Json(s))),
    }
}

/// Also mounted on GET.
#[utoipa::path(post, path = "/api/sales/seed", tag = "sales",
    responses(
        (status = 201, description = "Default salesperson created", body = crate::openapi::SalespersonDoc),
        (status = 200, description = "Already present; existing record returned", body = crate::openapi::SalespersonDoc)
    ))]
pub async fn seed(State(state): State<ServerState>) -> Result<(StatusCode, Json<Salesperson>), JsonApiError> {
    match state.catalog.salespeople.seed().await? {
        Insertion::Created(s) => Ok((StatusCode::CREATED, Json(s))),
        Insertion::Existing(s) => Ok((StatusCode::OK, Json(s))),
    }
}
