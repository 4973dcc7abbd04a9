use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Writes attempted on a host where no writable backend is configured.
    #[error("storage not configured: {0}")]
    NotConfigured(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("key-value store error: {0}")]
    Kv(String),
    #[error("storage io error: {0}")]
    Io(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn unconfigured() -> Self {
        Self::NotConfigured(
            "set DATABASE_URL, or KV_REST_API_URL and KV_REST_API_TOKEN, on this host".into(),
        )
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}
