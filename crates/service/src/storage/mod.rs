//! Storage abstractions for the catalog.
//!
//! Every entity collection is served through [`CollectionStore`]. Two
//! families implement it:
//! - [`json_list_store::JsonListStore`]: the whole collection is one JSON
//!   array document, kept either in a local file ([`file`]) or under a single
//!   key of a REST key-value store ([`kv`]).
//! - [`relational`]: one table per collection via SeaORM.
//!
//! [`backend`] decides which family is live for the process.

pub mod backend;
pub mod file;
pub mod json_list_store;
pub mod kv;
pub mod relational;

use async_trait::async_trait;
use models::catalog::{NamedEntity, Product, Salesperson};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ServiceError;

pub use backend::{BackendKind, Stores};

/// The persisted collections and their document/table names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Suppliers,
    Tags,
    Categories,
    Salespeople,
}

impl Collection {
    /// File stem, key-value key and table name all share this.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Suppliers => "suppliers",
            Collection::Tags => "tags",
            Collection::Categories => "categories",
            Collection::Salespeople => "salespeople",
        }
    }
}

/// A record that can live in a collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Whether `existing` blocks storing `self` (uniqueness rules).
    fn conflicts_with(&self, _existing: &Self) -> bool {
        false
    }
}

impl Record for Product {
    fn id(&self) -> &str { &self.id }
}

impl Record for NamedEntity {
    fn id(&self) -> &str { &self.id }
    fn conflicts_with(&self, existing: &Self) -> bool { self.same_name(existing) }
}

impl Record for Salesperson {
    fn id(&self) -> &str { &self.id }
    fn conflicts_with(&self, existing: &Self) -> bool { self.collides_with(existing) }
}

/// Outcome of an insert under uniqueness rules.
#[derive(Clone, Debug, PartialEq)]
pub enum Insertion<T> {
    Created(T),
    /// Nothing was written; this is the stored record that collided.
    Existing(T),
}

impl<T> Insertion<T> {
    pub fn into_inner(self) -> T {
        match self {
            Insertion::Created(r) | Insertion::Existing(r) => r,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Insertion::Created(_))
    }
}

/// Backend-agnostic access to one collection.
#[async_trait]
pub trait CollectionStore<T: Record>: Send + Sync {
    /// All records. Read failures are logged and yield an empty list.
    async fn list(&self) -> Vec<T>;

    async fn get(&self, id: &str) -> Option<T> {
        self.list().await.into_iter().find(|r| r.id() == id)
    }

    /// Store a new record unless an existing one conflicts with it.
    async fn insert(&self, record: T) -> Result<Insertion<T>, ServiceError>;

    /// Replace the record with the same id; `NotFound` when absent.
    async fn replace(&self, record: T) -> Result<T, ServiceError>;

    /// Remove by id; returns whether a record was removed.
    async fn remove(&self, id: &str) -> Result<bool, ServiceError>;
}

pub(crate) fn first_conflict<'a, T: Record>(existing: &'a [T], candidate: &T) -> Option<&'a T> {
    existing.iter().find(|r| candidate.conflicts_with(r))
}

/// A replacement may not take over the unique values of another record.
pub(crate) fn check_replacement<T: Record>(
    existing: &[T],
    candidate: &T,
    collection: Collection,
) -> Result<(), ServiceError> {
    match existing.iter().find(|r| r.id() != candidate.id() && candidate.conflicts_with(r)) {
        Some(other) => Err(ServiceError::Validation(format!(
            "conflicts with {} {}",
            collection.key(),
            other.id()
        ))),
        None => Ok(()),
    }
}
