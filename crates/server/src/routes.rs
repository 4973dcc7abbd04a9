pub mod catalog;
pub mod products;
pub mod sales;
pub mod taxonomy;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/api/products",
            get(products::list)
                .post(products::create)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/products/toggle", post(products::toggle))
        .route("/api/suppliers", get(taxonomy::list_suppliers).post(taxonomy::create_supplier))
        .route("/api/tags", get(taxonomy::list_tags).post(taxonomy::create_tag))
        .route("/api/categories", get(taxonomy::list_categories).post(taxonomy::create_category))
        .route("/api/sales", get(sales::list).post(sales::create))
        .route("/api/sales/seed", get(sales::seed).post(sales::seed))
        .route("/api/catalog", get(catalog::browse));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
