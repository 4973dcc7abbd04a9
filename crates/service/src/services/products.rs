use std::sync::Arc;

use models::catalog::{new_id, NewProduct, Product, ProductStatus, ProductUpdate};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::CollectionStore;

/// Product repository on top of whichever store is active.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn CollectionStore<Product>>,
}

impl ProductService {
    pub fn new(store: Arc<dyn CollectionStore<Product>>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Vec<Product> {
        self.store.list().await
    }

    pub async fn get(&self, id: &str) -> Option<Product> {
        self.store.get(id).await
    }

    /// All products, or only those with the given status.
    pub async fn list_by_status(&self, status: Option<ProductStatus>) -> Vec<Product> {
        let all = self.store.list().await;
        match status {
            None => all,
            Some(s) => all.into_iter().filter(|p| p.status == s).collect(),
        }
    }

    /// Validate, normalize and store a new product under a fresh id.
    pub async fn add(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let product = input.into_product(new_id(), ProductStatus::Published)?;
        let stored = self.store.insert(product).await?.into_inner();
        info!(id = %stored.id, title = %stored.title, "product added");
        Ok(stored)
    }

    /// Full replace. A body without `status` keeps the stored status.
    pub async fn update(&self, input: ProductUpdate) -> Result<Product, ServiceError> {
        let id = input.id.trim().to_string();
        if id.is_empty() {
            return Err(ServiceError::Validation("id required".into()));
        }
        input.fields.validate()?;
        let status = match input.fields.status {
            Some(s) => s,
            None => self
                .store
                .get(&id)
                .await
                .map(|current| current.status)
                .ok_or_else(|| ServiceError::not_found("product"))?,
        };
        let product = input.fields.into_product(id, status)?;
        let stored = self.store.replace(product).await?;
        info!(id = %stored.id, "product updated");
        Ok(stored)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let removed = self.store.remove(id).await?;
        if removed {
            info!(id, "product deleted");
        }
        Ok(removed)
    }

    /// Change only the status. `None` when no product has this id.
    pub async fn set_status(&self, id: &str, status: ProductStatus) -> Result<Option<Product>, ServiceError> {
        let Some(mut product) = self.store.get(id).await else {
            return Ok(None);
        };
        product.status = status;
        match self.store.replace(product).await {
            Ok(stored) => {
                info!(id, status = %status, "product status changed");
                Ok(Some(stored))
            }
            // removed between the read and the write
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
