//! Entity repositories and the public catalog view.

pub mod catalog_query;
pub mod products;
pub mod salespeople;
pub mod taxonomy;

use configs::StorageConfig;

use crate::errors::ServiceError;
use crate::storage::{BackendKind, Stores};

pub use catalog_query::{CatalogPage, CatalogQuery, SortKey};
pub use products::ProductService;
pub use salespeople::SalespersonService;
pub use taxonomy::NamedEntityService;

/// Every repository, bound to the backend chosen at startup.
#[derive(Clone)]
pub struct Catalog {
    pub products: ProductService,
    pub suppliers: NamedEntityService,
    pub tags: NamedEntityService,
    pub categories: NamedEntityService,
    pub salespeople: SalespersonService,
    backend: BackendKind,
}

impl Catalog {
    pub fn new(stores: Stores) -> Self {
        Self {
            products: ProductService::new(stores.products),
            suppliers: NamedEntityService::new(stores.suppliers, "supplier"),
            tags: NamedEntityService::new(stores.tags, "tag"),
            categories: NamedEntityService::new(stores.categories, "category"),
            salespeople: SalespersonService::new(stores.salespeople),
            backend: stores.kind,
        }
    }

    pub async fn open(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        Ok(Self::new(Stores::open(cfg).await?))
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub async fn browse(&self, query: &CatalogQuery) -> CatalogPage {
        query.apply(self.products.get_all().await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::file::FileDocuments;
    use crate::storage::kv::KvDocuments;
    use crate::storage::Insertion;
    use crate::test_support::{sqlite_backend, temp_dir, FakeKv};
    use configs::KvConfig;
    use models::catalog::{NamedEntity, NewProduct, ProductStatus, ProductUpdate, Salesperson, PLACEHOLDER_IMAGE};
    use serde_json::json;

    fn file_catalog(prefix: &str) -> (Catalog, std::path::PathBuf) {
        let dir = temp_dir(prefix);
        let stores = Stores::documents(BackendKind::File, Arc::new(FileDocuments::new(&dir, true)));
        (Catalog::new(stores), dir)
    }

    /// Behaviour every backend must share.
    async fn exercise(catalog: &Catalog) -> Result<(), anyhow::Error> {
        // add then list
        let widget = catalog.products.add(NewProduct::new("Widget", "100")).await?;
        assert_eq!(widget.title, "Widget");
        assert_eq!(widget.price, 100.0);
        assert_eq!(widget.status, ProductStatus::Published);
        assert_eq!(widget.image, PLACEHOLDER_IMAGE);
        assert!(catalog.products.get_all().await.iter().any(|p| p.id == widget.id));

        // textual prices are stored as numbers
        let gadget = catalog.products.add(NewProduct::new("Gadget", "1500.50")).await?;
        assert_eq!(gadget.price, 1500.5);
        assert_eq!(catalog.products.get(&gadget.id).await.map(|p| p.price), Some(1500.5));

        // status toggling hides and restores
        let archived = catalog.products.set_status(&widget.id, ProductStatus::Archived).await?;
        assert_eq!(archived.map(|p| p.status), Some(ProductStatus::Archived));
        assert!(catalog.browse(&CatalogQuery::default()).await.products.iter().all(|p| p.id != widget.id));
        catalog.products.set_status(&widget.id, ProductStatus::Published).await?;
        assert!(catalog.browse(&CatalogQuery::default()).await.products.iter().any(|p| p.id == widget.id));
        assert!(catalog.products.set_status("missing", ProductStatus::Archived).await?.is_none());

        // update keeps status when omitted and rejects unknown ids
        catalog.products.set_status(&gadget.id, ProductStatus::Archived).await?;
        let renamed = catalog
            .products
            .update(ProductUpdate { id: gadget.id.clone(), fields: NewProduct::new("Gadget Pro", 2000.0) })
            .await?;
        assert_eq!(renamed.status, ProductStatus::Archived);
        assert_eq!(catalog.products.list_by_status(Some(ProductStatus::Archived)).await.len(), 1);
        let ghost = ProductUpdate { id: "missing".into(), fields: NewProduct::new("Ghost", 1.0) };
        assert!(matches!(catalog.products.update(ghost).await, Err(ServiceError::NotFound(_))));

        // delete
        assert!(catalog.products.delete(&widget.id).await?);
        assert!(!catalog.products.delete(&widget.id).await?);
        assert!(catalog.products.get_all().await.iter().all(|p| p.id != widget.id));

        // names are unique ignoring case
        let acme = catalog.suppliers.add("Acme").await?;
        assert!(acme.is_created());
        let again = catalog.suppliers.add("  ACME ").await?;
        assert_eq!(again, Insertion::Existing(acme.into_inner()));
        assert_eq!(catalog.suppliers.get_all().await.len(), 1);
        assert!(matches!(catalog.tags.add("   ").await, Err(ServiceError::Validation(_))));

        // renaming onto another entity's name is rejected
        let acme = catalog.suppliers.get_all().await.remove(0);
        let beta = catalog.suppliers.add("Beta").await?.into_inner();
        let clash = NamedEntity { id: beta.id.clone(), name: "acme".into() };
        assert!(matches!(catalog.suppliers.update(clash).await, Err(ServiceError::Validation(_))));
        let recased = catalog.suppliers.update(NamedEntity { id: acme.id.clone(), name: "ACME".into() }).await?;
        assert_eq!(recased.name, "ACME");
        let mut names: Vec<String> = catalog.suppliers.get_all().await.into_iter().map(|s| s.name).collect();
        names.sort();
        assert_eq!(names, vec!["ACME".to_string(), "Beta".to_string()]);

        let sp = catalog.salespeople.seed().await?;
        assert!(sp.is_created());
        assert_eq!(catalog.salespeople.seed().await?, Insertion::Existing(sp.clone().into_inner()));
        assert!(!catalog.salespeople.add("wahid", "1").await?.is_created());
        assert_eq!(catalog.salespeople.get_all().await.len(), 1);

        let rina = catalog.salespeople.add("Rina", "6281").await?.into_inner();
        let taken_phone = Salesperson { id: rina.id.clone(), name: "Rina".into(), phone: "62895346372918".into() };
        assert!(matches!(catalog.salespeople.update(taken_phone).await, Err(ServiceError::Validation(_))));
        let moved = catalog
            .salespeople
            .update(Salesperson { id: rina.id.clone(), name: " Rina S ".into(), phone: "6282".into() })
            .await?;
        assert_eq!((moved.name.as_str(), moved.phone.as_str()), ("Rina S", "6282"));
        let ghost = Salesperson { id: "missing".into(), name: "Ghost".into(), phone: "0".into() };
        assert!(matches!(catalog.salespeople.update(ghost).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn file_backend_behaviour() -> Result<(), anyhow::Error> {
        let (catalog, dir) = file_catalog("catalog_file");
        exercise(&catalog).await?;
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn kv_backend_behaviour() -> Result<(), anyhow::Error> {
        let kv = FakeKv::start("tok").await?;
        let docs = KvDocuments::new(&KvConfig { rest_api_url: kv.base_url.clone(), rest_api_token: "tok".into() })?;
        let catalog = Catalog::new(Stores::documents(BackendKind::KeyValue, Arc::new(docs)));
        exercise(&catalog).await?;
        assert!(kv.raw("suppliers").await.is_some_and(|raw| raw.contains("ACME") && raw.contains("Beta")));
        Ok(())
    }

    #[tokio::test]
    async fn relational_backend_behaviour() -> Result<(), anyhow::Error> {
        let (backend, dir) = sqlite_backend("catalog_rel").await?;
        let catalog = Catalog::new(Stores::relational(backend));
        assert_eq!(catalog.backend(), BackendKind::Relational);
        exercise(&catalog).await?;
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_keeps_relative_order() -> Result<(), anyhow::Error> {
        let (catalog, dir) = file_catalog("catalog_order");
        let a = catalog.tags.add("a").await?.into_inner();
        let b = catalog.tags.add("b").await?.into_inner();
        let c = catalog.tags.add("c").await?.into_inner();
        assert!(catalog.tags.delete(&b.id).await?);
        assert_eq!(catalog.tags.get_all().await, vec![a, c]);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn tag_inputs_normalize_on_add() -> Result<(), anyhow::Error> {
        let (catalog, dir) = file_catalog("catalog_tags");
        let input: NewProduct = serde_json::from_value(json!({
            "title": "Mug", "price": 3, "pcsPrice": "", "tagId": "t1"
        }))?;
        let p = catalog.products.add(input).await?;
        assert_eq!(p.tag_ids, vec!["t1".to_string()]);
        assert_eq!(p.pcs_price, None);

        let raw = tokio::fs::read_to_string(dir.join("products.json")).await?;
        let stored: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(stored[0]["tagIds"], json!(["t1"]));
        assert_eq!(stored[0]["price"], json!(3.0));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn renaming_a_category() -> Result<(), anyhow::Error> {
        let (catalog, dir) = file_catalog("catalog_rename");
        let drinks = catalog.categories.add("Drinks").await?.into_inner();
        let renamed = catalog
            .categories
            .update(NamedEntity { id: drinks.id.clone(), name: " Beverages ".into() })
            .await?;
        assert_eq!(renamed.name, "Beverages");
        assert!(matches!(
            catalog.categories.update(NamedEntity { id: "nope".into(), name: "x".into() }).await,
            Err(ServiceError::NotFound(_))
        ));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
