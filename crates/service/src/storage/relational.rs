//! Relational backend: one table per collection through SeaORM.
//!
//! The schema is created (or widened) lazily by the first store call and
//! only once per process. A failed attempt leaves the gate open so the next
//! call retries.

use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use configs::DatabaseConfig;
use migration::{Migrator, MigratorTrait};
use models::catalog::{NamedEntity, Product, Salesperson};
use models::named::NamedTable;
use models::{product, salesperson};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::{check_replacement, first_conflict, Collection, CollectionStore, Insertion};

pub struct RelationalBackend {
    db: DatabaseConnection,
    schema: OnceCell<()>,
}

impl RelationalBackend {
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Arc<Self>, ServiceError> {
        let db = models::db::connect_with_config(cfg).await?;
        Ok(Self::from_connection(db))
    }

    pub fn from_connection(db: DatabaseConnection) -> Arc<Self> {
        Arc::new(Self { db, schema: OnceCell::new() })
    }

    /// Connection with the catalog schema guaranteed in place.
    pub async fn ready(&self) -> Result<&DatabaseConnection, ServiceError> {
        self.schema
            .get_or_try_init(|| async {
                Migrator::up(&self.db, None).await?;
                info!("relational schema ready");
                Ok::<(), ServiceError>(())
            })
            .await?;
        Ok(&self.db)
    }
}

/// Reads never fail outward: an unreachable database lists as empty.
fn or_empty<T>(collection: Collection, res: Result<Vec<T>, ServiceError>) -> Vec<T> {
    res.unwrap_or_else(|e| {
        warn!(backend = "relational", collection = collection.key(), error = %e, "collection read failed; treating as empty");
        Vec::new()
    })
}

pub struct SeaOrmProductStore {
    backend: Arc<RelationalBackend>,
}

impl SeaOrmProductStore {
    pub fn new(backend: Arc<RelationalBackend>) -> Arc<Self> {
        Arc::new(Self { backend })
    }
}

#[async_trait]
impl CollectionStore<Product> for SeaOrmProductStore {
    async fn list(&self) -> Vec<Product> {
        let res = async {
            let db = self.backend.ready().await?;
            let rows = product::Entity::find()
                .order_by_asc(product::Column::Title)
                .all(db)
                .await?;
            Ok::<_, ServiceError>(rows.into_iter().map(Product::from).collect())
        }
        .await;
        or_empty(Collection::Products, res)
    }

    async fn get(&self, id: &str) -> Option<Product> {
        let db = self.backend.ready().await.ok()?;
        match product::Entity::find_by_id(id.to_string()).one(db).await {
            Ok(row) => row.map(Product::from),
            Err(e) => {
                warn!(backend = "relational", error = %e, "product lookup failed");
                None
            }
        }
    }

    async fn insert(&self, record: Product) -> Result<Insertion<Product>, ServiceError> {
        let db = self.backend.ready().await?;
        product::Entity::insert(product::ActiveModel::from(&record))
            .exec_without_returning(db)
            .await?;
        Ok(Insertion::Created(record))
    }

    async fn replace(&self, record: Product) -> Result<Product, ServiceError> {
        let db = self.backend.ready().await?;
        let mut am = product::ActiveModel::from(&record);
        am.id = NotSet;
        let res = product::Entity::update_many()
            .set(am)
            .filter(product::Column::Id.eq(record.id.clone()))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("product"));
        }
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let db = self.backend.ready().await?;
        let res = product::Entity::delete_by_id(id.to_string()).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}

/// Suppliers, tags and categories: any `{id, name}` table.
pub struct SeaOrmNamedStore<E> {
    backend: Arc<RelationalBackend>,
    collection: Collection,
    _table: PhantomData<fn() -> E>,
}

impl<E: NamedTable> SeaOrmNamedStore<E> {
    pub fn new(backend: Arc<RelationalBackend>, collection: Collection) -> Arc<Self> {
        Arc::new(Self { backend, collection, _table: PhantomData })
    }

    async fn fetch(db: &DatabaseConnection) -> Result<Vec<NamedEntity>, ServiceError>
    where
        E::Model: Send + Sync,
    {
        let rows = E::find().order_by_asc(E::name_column()).all(db).await?;
        Ok(rows.into_iter().map(E::to_record).collect())
    }
}

#[async_trait]
impl<E> CollectionStore<NamedEntity> for SeaOrmNamedStore<E>
where
    E: NamedTable,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send + Sync,
{
    async fn list(&self) -> Vec<NamedEntity> {
        let res = match self.backend.ready().await {
            Ok(db) => Self::fetch(db).await,
            Err(e) => Err(e),
        };
        or_empty(self.collection, res)
    }

    async fn insert(&self, record: NamedEntity) -> Result<Insertion<NamedEntity>, ServiceError> {
        let db = self.backend.ready().await?;
        let existing = Self::fetch(db).await?;
        if let Some(found) = first_conflict(&existing, &record) {
            return Ok(Insertion::Existing(found.clone()));
        }
        E::insert(E::to_active(&record)).exec_without_returning(db).await?;
        Ok(Insertion::Created(record))
    }

    async fn replace(&self, record: NamedEntity) -> Result<NamedEntity, ServiceError> {
        let db = self.backend.ready().await?;
        check_replacement(&Self::fetch(db).await?, &record, self.collection)?;
        let res = E::update_many()
            .col_expr(E::name_column(), Expr::value(record.name.clone()))
            .filter(E::id_column().eq(record.id.clone()))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(self.collection.key()));
        }
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let db = self.backend.ready().await?;
        let res = E::delete_many().filter(E::id_column().eq(id.to_string())).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}

pub struct SeaOrmSalespersonStore {
    backend: Arc<RelationalBackend>,
}

impl SeaOrmSalespersonStore {
    pub fn new(backend: Arc<RelationalBackend>) -> Arc<Self> {
        Arc::new(Self { backend })
    }

    async fn fetch(db: &DatabaseConnection) -> Result<Vec<Salesperson>, ServiceError> {
        let rows = salesperson::Entity::find()
            .order_by_asc(salesperson::Column::Name)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Salesperson::from).collect())
    }
}

#[async_trait]
impl CollectionStore<Salesperson> for SeaOrmSalespersonStore {
    async fn list(&self) -> Vec<Salesperson> {
        let res = match self.backend.ready().await {
            Ok(db) => Self::fetch(db).await,
            Err(e) => Err(e),
        };
        or_empty(Collection::Salespeople, res)
    }

    async fn insert(&self, record: Salesperson) -> Result<Insertion<Salesperson>, ServiceError> {
        let db = self.backend.ready().await?;
        let existing = Self::fetch(db).await?;
        if let Some(found) = first_conflict(&existing, &record) {
            return Ok(Insertion::Existing(found.clone()));
        }
        salesperson::Entity::insert(salesperson::ActiveModel::from(&record))
            .exec_without_returning(db)
            .await?;
        Ok(Insertion::Created(record))
    }

    async fn replace(&self, record: Salesperson) -> Result<Salesperson, ServiceError> {
        let db = self.backend.ready().await?;
        check_replacement(&Self::fetch(db).await?, &record, Collection::Salespeople)?;
        let mut am = salesperson::ActiveModel::from(&record);
        am.id = NotSet;
        let res = salesperson::Entity::update_many()
            .set(am)
            .filter(salesperson::Column::Id.eq(record.id.clone()))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("salesperson"));
        }
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let db = self.backend.ready().await?;
        let res = salesperson::Entity::delete_by_id(id.to_string()).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
