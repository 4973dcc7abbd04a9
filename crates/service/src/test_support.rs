#![cfg(test)]
use std::{collections::HashMap, path::PathBuf, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use configs::DatabaseConfig;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::storage::relational::RelationalBackend;

/// Fresh, not yet created directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}", prefix, Uuid::new_v4()))
}

/// Relational backend over a throwaway SQLite file. Returns the directory
/// holding it so the test can clean up.
pub async fn sqlite_backend(prefix: &str) -> Result<(Arc<RelationalBackend>, PathBuf), anyhow::Error> {
    let dir = temp_dir(prefix);
    tokio::fs::create_dir_all(&dir).await?;
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.join("catalog.db").display()),
        max_connections: 1,
        ..DatabaseConfig::default()
    };
    let backend = RelationalBackend::connect(&cfg).await?;
    Ok((backend, dir))
}

#[derive(Clone)]
struct FakeKvState {
    token: String,
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeKvState {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", self.token))
            .unwrap_or(false)
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
}

async fn kv_get(
    State(st): State<FakeKvState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !st.authorized(&headers) {
        return unauthorized();
    }
    let value = st.values.lock().await.get(&key).cloned();
    (StatusCode::OK, Json(json!({ "result": value })))
}

async fn kv_set(
    State(st): State<FakeKvState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: String,
) -> (StatusCode, Json<Value>) {
    if !st.authorized(&headers) {
        return unauthorized();
    }
    st.values.lock().await.insert(key, body);
    (StatusCode::OK, Json(json!({ "result": "OK" })))
}

/// In-process stand-in for an Upstash-style REST key-value store.
pub struct FakeKv {
    pub base_url: String,
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeKv {
    pub async fn start(token: &str) -> Result<Self, anyhow::Error> {
        let values = Arc::new(Mutex::new(HashMap::new()));
        let state = FakeKvState { token: token.to_string(), values: values.clone() };
        let app = Router::new()
            .route("/get/:key", get(kv_get))
            .route("/set/:key", post(kv_set))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { base_url: format!("http://{}", addr), values })
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }
}
