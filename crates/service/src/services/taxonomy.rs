use std::sync::Arc;

use models::catalog::NamedEntity;
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::{CollectionStore, Insertion};

/// Suppliers, tags and categories share one repository shape.
#[derive(Clone)]
pub struct NamedEntityService {
    store: Arc<dyn CollectionStore<NamedEntity>>,
    label: &'static str,
}

fn required_name(name: &str) -> Result<&str, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("name required".into()));
    }
    Ok(name)
}

impl NamedEntityService {
    pub fn new(store: Arc<dyn CollectionStore<NamedEntity>>, label: &'static str) -> Self {
        Self { store, label }
    }

    pub async fn get_all(&self) -> Vec<NamedEntity> {
        self.store.list().await
    }

    /// Add by name. A case-insensitive duplicate is not written; the stored
    /// entity is returned as [`Insertion::Existing`].
    pub async fn add(&self, name: &str) -> Result<Insertion<NamedEntity>, ServiceError> {
        let name = required_name(name)?;
        let outcome = self.store.insert(NamedEntity::new(name)).await?;
        match &outcome {
            Insertion::Created(e) => info!(kind = self.label, id = %e.id, name = %e.name, "entity added"),
            Insertion::Existing(e) => info!(kind = self.label, id = %e.id, "duplicate name; keeping existing entity"),
        }
        Ok(outcome)
    }

    pub async fn update(&self, entity: NamedEntity) -> Result<NamedEntity, ServiceError> {
        let name = required_name(&entity.name)?.to_string();
        self.store.replace(NamedEntity { id: entity.id, name }).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.store.remove(id).await
    }
}
