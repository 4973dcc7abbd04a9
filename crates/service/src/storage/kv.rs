//! REST key-value backend (Upstash / Vercel KV wire protocol).
//!
//! Each collection is one key whose value is the JSON array as a string:
//! - `GET  {url}/get/{key}` → `{"result": "<json>" | null}`
//! - `POST {url}/set/{key}` with the raw value as body → `{"result": "OK"}`
//!
//! Failures come back as `{"error": "..."}`, usually with a 4xx status.

use std::time::Duration;

use async_trait::async_trait;
use configs::KvConfig;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::json_list_store::DocumentBackend;
use crate::storage::Collection;

#[derive(Debug, Deserialize)]
struct KvReply {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

pub struct KvDocuments {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl KvDocuments {
    pub fn new(cfg: &KvConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Kv(e.to_string()))?;
        Ok(Self {
            client,
            base_url: cfg.rest_api_url.trim().trim_end_matches('/').to_string(),
            token: cfg.rest_api_token.trim().to_string(),
        })
    }

    fn url(&self, command: &str, collection: Collection) -> String {
        format!("{}/{}/{}", self.base_url, command, collection.key())
    }

    async fn reply(resp: reqwest::Response) -> Result<KvReply, ServiceError> {
        let status = resp.status();
        let reply = resp.json::<KvReply>().await;
        match reply {
            Ok(KvReply { error: Some(err), .. }) => Err(ServiceError::Kv(format!("{status}: {err}"))),
            Ok(reply) if status.is_success() => Ok(reply),
            Ok(_) => Err(ServiceError::Kv(format!("unexpected status {status}"))),
            Err(e) => Err(ServiceError::Kv(format!("{status}: undecodable reply: {e}"))),
        }
    }
}

#[async_trait]
impl DocumentBackend for KvDocuments {
    fn name(&self) -> &'static str {
        "kv"
    }

    async fn load(&self, collection: Collection) -> Result<Option<Vec<u8>>, ServiceError> {
        let resp = self
            .client
            .get(self.url("get", collection))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ServiceError::Kv(e.to_string()))?;
        let reply = Self::reply(resp).await?;
        debug!(key = collection.key(), present = reply.result.is_some(), "kv get");
        match reply.result {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s.into_bytes())),
            // some clients store the array as native JSON
            Some(other) => serde_json::to_vec(&other).map(Some).map_err(|e| ServiceError::Kv(e.to_string())),
        }
    }

    async fn save(&self, collection: Collection, body: Vec<u8>) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(self.url("set", collection))
            .bearer_auth(&self.token)
            .body(body)
            .send()
            .await
            .map_err(|e| ServiceError::Kv(e.to_string()))?;
        Self::reply(resp).await?;
        debug!(key = collection.key(), "kv set");
        Ok(())
    }
}
