use std::sync::Arc;

use configs::StorageConfig;
use models::catalog::{NamedEntity, Product, Salesperson};
use models::{category, supplier, tag};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::file::FileDocuments;
use crate::storage::json_list_store::{DocumentBackend, JsonListStore};
use crate::storage::kv::KvDocuments;
use crate::storage::relational::{
    RelationalBackend, SeaOrmNamedStore, SeaOrmProductStore, SeaOrmSalespersonStore,
};
use crate::storage::{Collection, CollectionStore};

/// Which persistence family serves the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Relational,
    KeyValue,
    File,
    /// Managed host without credentials: bundled files are readable, writes fail.
    ReadOnlyFile,
}

impl BackendKind {
    /// Database URL first, then KV credentials (URL and token), then local files.
    pub fn select(cfg: &StorageConfig) -> Self {
        if cfg.database.is_configured() {
            BackendKind::Relational
        } else if cfg.kv.is_configured() {
            BackendKind::KeyValue
        } else if cfg.managed_host {
            BackendKind::ReadOnlyFile
        } else {
            BackendKind::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Relational => "relational",
            BackendKind::KeyValue => "kv",
            BackendKind::File => "file",
            BackendKind::ReadOnlyFile => "file-readonly",
        }
    }
}

/// One store per collection, all on the same backend.
#[derive(Clone)]
pub struct Stores {
    pub kind: BackendKind,
    pub products: Arc<dyn CollectionStore<Product>>,
    pub suppliers: Arc<dyn CollectionStore<NamedEntity>>,
    pub tags: Arc<dyn CollectionStore<NamedEntity>>,
    pub categories: Arc<dyn CollectionStore<NamedEntity>>,
    pub salespeople: Arc<dyn CollectionStore<Salesperson>>,
}

impl Stores {
    /// Select and open the backend. Relational connections are opened here;
    /// the schema is bootstrapped on first use.
    pub async fn open(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        let kind = BackendKind::select(cfg);
        info!(backend = kind.as_str(), "storage backend selected");
        match kind {
            BackendKind::Relational => {
                let backend = RelationalBackend::connect(&cfg.database).await?;
                Ok(Self::relational(backend))
            }
            BackendKind::KeyValue => Ok(Self::documents(kind, Arc::new(KvDocuments::new(&cfg.kv)?))),
            BackendKind::File => Ok(Self::documents(kind, Arc::new(FileDocuments::new(&cfg.data_dir, true)))),
            BackendKind::ReadOnlyFile => {
                warn!(data_dir = %cfg.data_dir, "managed host without DATABASE_URL or KV credentials; writes are disabled");
                Ok(Self::documents(kind, Arc::new(FileDocuments::new(&cfg.data_dir, false))))
            }
        }
    }

    /// Document-per-collection stores over a file or KV backend.
    pub fn documents(kind: BackendKind, backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            kind,
            products: JsonListStore::<Product>::new(backend.clone(), Collection::Products),
            suppliers: JsonListStore::<NamedEntity>::new(backend.clone(), Collection::Suppliers),
            tags: JsonListStore::<NamedEntity>::new(backend.clone(), Collection::Tags),
            categories: JsonListStore::<NamedEntity>::new(backend.clone(), Collection::Categories),
            salespeople: JsonListStore::<Salesperson>::new(backend, Collection::Salespeople),
        }
    }

    pub fn relational(backend: Arc<RelationalBackend>) -> Self {
        Self {
            kind: BackendKind::Relational,
            products: SeaOrmProductStore::new(backend.clone()),
            suppliers: SeaOrmNamedStore::<supplier::Entity>::new(backend.clone(), Collection::Suppliers),
            tags: SeaOrmNamedStore::<tag::Entity>::new(backend.clone(), Collection::Tags),
            categories: SeaOrmNamedStore::<category::Entity>::new(backend.clone(), Collection::Categories),
            salespeople: SeaOrmSalespersonStore::new(backend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_dir;
    use configs::{DatabaseConfig, KvConfig};

    fn storage(db: &str, kv_url: &str, kv_token: &str, managed: bool) -> StorageConfig {
        StorageConfig {
            managed_host: managed,
            database: DatabaseConfig { url: db.into(), ..DatabaseConfig::default() },
            kv: KvConfig { rest_api_url: kv_url.into(), rest_api_token: kv_token.into() },
            ..StorageConfig::default()
        }
    }

    #[test]
    fn selection_follows_priority() {
        assert_eq!(BackendKind::select(&storage("postgres://h/db", "https://kv", "t", true)), BackendKind::Relational);
        assert_eq!(BackendKind::select(&storage("", "https://kv", "t", true)), BackendKind::KeyValue);
        assert_eq!(BackendKind::select(&storage("", "", "", false)), BackendKind::File);
        assert_eq!(BackendKind::select(&storage("", "", "", true)), BackendKind::ReadOnlyFile);
    }

    #[test]
    fn kv_needs_both_url_and_token() {
        assert_eq!(BackendKind::select(&storage("", "https://kv", "", false)), BackendKind::File);
        assert_eq!(BackendKind::select(&storage("", "", "t", true)), BackendKind::ReadOnlyFile);
    }

    #[tokio::test]
    async fn read_only_mode_reads_bundled_files_and_refuses_writes() -> Result<(), anyhow::Error> {
        let dir = temp_dir("backend_ro");
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join("tags.json"), r#"[{"id":"t1","name":"New"}]"#).await?;

        let mut cfg = storage("", "", "", true);
        cfg.data_dir = dir.to_string_lossy().into_owned();
        let stores = Stores::open(&cfg).await?;
        assert_eq!(stores.kind, BackendKind::ReadOnlyFile);

        assert_eq!(stores.tags.list().await.len(), 1);
        assert!(stores.products.list().await.is_empty());
        let err = stores.tags.insert(NamedEntity::new("Sale")).await;
        assert!(matches!(err, Err(ServiceError::NotConfigured(_))));
        assert!(matches!(stores.tags.remove("t1").await, Err(ServiceError::NotConfigured(_))));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
