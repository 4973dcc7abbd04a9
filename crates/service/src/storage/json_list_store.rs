use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::storage::{check_replacement, first_conflict, Collection, CollectionStore, Insertion, Record};

/// Where a collection's JSON array document lives.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short label for logs (`file`, `kv`).
    fn name(&self) -> &'static str;

    /// Fail fast when writes can never succeed on this backend.
    fn ensure_writable(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Raw document bytes, or `None` when the collection was never written.
    async fn load(&self, collection: Collection) -> Result<Option<Vec<u8>>, ServiceError>;

    /// Replace the whole document.
    async fn save(&self, collection: Collection, body: Vec<u8>) -> Result<(), ServiceError>;

    /// Keep a copy of a document that is about to be rewritten without its
    /// unreadable parts.
    async fn set_aside(&self, _collection: Collection, _body: Vec<u8>) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// A collection persisted as one pretty-printed JSON array.
///
/// Every write reloads the document, applies the change and rewrites it
/// wholesale. Writes through the same store are serialized; writers in
/// other processes are not, so the last full rewrite wins.
pub struct JsonListStore<T> {
    backend: Arc<dyn DocumentBackend>,
    collection: Collection,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> JsonListStore<T> {
    pub fn new(backend: Arc<dyn DocumentBackend>, collection: Collection) -> Arc<Self> {
        Arc::new(Self { backend, collection, write_lock: Mutex::new(()), _marker: PhantomData })
    }

    /// Decode a document, skipping malformed entries. The flag is false when
    /// anything had to be dropped.
    fn decode(&self, bytes: &[u8]) -> (Vec<T>, bool) {
        let entries: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(backend = self.backend.name(), collection = self.collection.key(), error = %e, "collection document is not a JSON array; treating as empty");
                return (Vec::new(), false);
            }
        };
        let total = entries.len();
        let records: Vec<T> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<T>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection = self.collection.key(), error = %e, "skipping malformed record");
                    None
                }
            })
            .collect();
        let clean = records.len() == total;
        (records, clean)
    }

    /// Unreadable documents and malformed entries are skipped.
    async fn read_lenient(&self) -> Vec<T> {
        match self.backend.load(self.collection).await {
            Ok(Some(bytes)) => self.decode(&bytes).0,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(backend = self.backend.name(), collection = self.collection.key(), error = %e, "collection read failed; treating as empty");
                Vec::new()
            }
        }
    }

    async fn write(&self, records: &[T]) -> Result<(), ServiceError> {
        let body = serde_json::to_vec_pretty(records).map_err(|e| ServiceError::Io(e.to_string()))?;
        self.backend.save(self.collection, body).await?;
        debug!(backend = self.backend.name(), collection = self.collection.key(), count = records.len(), "collection rewritten");
        Ok(())
    }

    /// Apply a mutation to the whole list and persist it when the closure
    /// reports a change.
    pub async fn update_list<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<(R, bool), ServiceError> + Send,
        R: Send,
    {
        self.backend.ensure_writable()?;
        let _guard = self.write_lock.lock().await;
        let (mut records, broken) = match self.backend.load(self.collection).await? {
            None => (Vec::new(), None),
            Some(bytes) => match self.decode(&bytes) {
                (records, true) => (records, None),
                (records, false) => (records, Some(bytes)),
            },
        };
        let (out, changed) = f(&mut records)?;
        if changed {
            if let Some(bytes) = broken {
                warn!(backend = self.backend.name(), collection = self.collection.key(), kept = records.len(), "rewriting collection without its unreadable entries");
                self.backend.set_aside(self.collection, bytes).await?;
            }
            self.write(&records).await?;
        }
        Ok(out)
    }
}

#[async_trait]
impl<T: Record> CollectionStore<T> for JsonListStore<T> {
    async fn list(&self) -> Vec<T> {
        self.read_lenient().await
    }

    async fn insert(&self, record: T) -> Result<Insertion<T>, ServiceError> {
        self.update_list(move |records| {
            if let Some(existing) = first_conflict(records, &record) {
                return Ok((Insertion::Existing(existing.clone()), false));
            }
            records.push(record.clone());
            Ok((Insertion::Created(record), true))
        })
        .await
    }

    async fn replace(&self, record: T) -> Result<T, ServiceError> {
        let collection = self.collection;
        self.update_list(move |records| {
            check_replacement(records, &record, collection)?;
            let slot = records
                .iter_mut()
                .find(|r| r.id() == record.id())
                .ok_or_else(|| ServiceError::not_found(collection.key()))?;
            *slot = record.clone();
            Ok((record, true))
        })
        .await
    }

    async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let id = id.to_string();
        self.update_list(move |records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            let removed = records.len() != before;
            Ok((removed, removed))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::FileDocuments;
    use crate::test_support::temp_dir;
    use models::catalog::NamedEntity;

    #[tokio::test]
    async fn json_list_store_crud_persists() -> Result<(), anyhow::Error> {
        let dir = temp_dir("json_list_store");
        let docs: Arc<dyn DocumentBackend> = Arc::new(FileDocuments::new(&dir, true));
        let store = JsonListStore::<NamedEntity>::new(docs.clone(), Collection::Tags);

        // initially empty
        assert!(store.list().await.is_empty());

        let a = store.insert(NamedEntity::new("alpha")).await?.into_inner();
        let b = store.insert(NamedEntity::new("beta")).await?.into_inner();
        let c = store.insert(NamedEntity::new("gamma")).await?.into_inner();

        // duplicate names (case-insensitive) are not written
        let dup = store.insert(NamedEntity::new("ALPHA")).await?;
        assert_eq!(dup, Insertion::Existing(a.clone()));
        assert_eq!(store.list().await.len(), 3);

        // replace keeps position
        let renamed = NamedEntity { id: b.id.clone(), name: "beta-2".into() };
        store.replace(renamed.clone()).await?;

        // remove keeps relative order of the rest
        assert!(store.remove(&a.id).await?);
        assert!(!store.remove(&a.id).await?);

        // reload from disk to ensure persistence
        let reloaded = JsonListStore::<NamedEntity>::new(docs, Collection::Tags);
        assert_eq!(reloaded.list().await, vec![renamed, c]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn replace_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let dir = temp_dir("json_list_replace");
        let store = JsonListStore::<NamedEntity>::new(Arc::new(FileDocuments::new(&dir, true)), Collection::Suppliers);
        let ghost = NamedEntity::new("ghost");
        assert!(matches!(store.replace(ghost).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_entries_are_dropped_on_next_write() -> Result<(), anyhow::Error> {
        let dir = temp_dir("json_list_corrupt");
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(
            dir.join("categories.json"),
            r#"[{"id":"1","name":"Drinks"},{"oops":true}]"#,
        )
        .await?;
        let store = JsonListStore::<NamedEntity>::new(Arc::new(FileDocuments::new(&dir, true)), Collection::Categories);

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Drinks");

        let snacks = store.insert(NamedEntity::new("Snacks")).await?.into_inner();
        let names: Vec<String> = store.list().await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Drinks".to_string(), snacks.name]);

        let raw = tokio::fs::read_to_string(dir.join("categories.json")).await?;
        assert!(!raw.contains("oops"));
        let kept = tokio::fs::read_to_string(dir.join("categories.json.corrupt")).await?;
        assert!(kept.contains("oops"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn unparseable_document_reads_empty_and_accepts_writes() -> Result<(), anyhow::Error> {
        let dir = temp_dir("json_list_garbage");
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join("tags.json"), "not json at all").await?;
        let store = JsonListStore::<NamedEntity>::new(Arc::new(FileDocuments::new(&dir, true)), Collection::Tags);

        assert!(store.list().await.is_empty());
        // nothing to remove, so nothing is rewritten
        assert!(!store.remove("x").await?);
        assert!(!dir.join("tags.json.corrupt").exists());

        let created = store.insert(NamedEntity::new("New")).await?;
        assert!(created.is_created());
        assert_eq!(store.list().await, vec![created.into_inner()]);
        assert_eq!(tokio::fs::read_to_string(dir.join("tags.json.corrupt")).await?, "not json at all");

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn rename_onto_another_name_is_rejected() -> Result<(), anyhow::Error> {
        let dir = temp_dir("json_list_rename");
        let store = JsonListStore::<NamedEntity>::new(Arc::new(FileDocuments::new(&dir, true)), Collection::Suppliers);
        let acme = store.insert(NamedEntity::new("Acme")).await?.into_inner();
        let beta = store.insert(NamedEntity::new("Beta")).await?.into_inner();

        let clash = NamedEntity { id: beta.id.clone(), name: "ACME".into() };
        assert!(matches!(store.replace(clash).await, Err(ServiceError::Validation(_))));
        // a case-only change of its own name is fine
        let recased = NamedEntity { id: acme.id.clone(), name: "ACME".into() };
        store.replace(recased.clone()).await?;
        assert_eq!(store.list().await, vec![recased, beta]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
