//! Catalog records and their relational mappings.
//!
//! `catalog` holds the wire/document shapes shared by every storage backend;
//! the per-table modules are SeaORM entities used by the relational backend.

pub mod errors;
pub mod db;
pub mod catalog;
pub mod named;
pub mod product;
pub mod supplier;
pub mod tag;
pub mod category;
pub mod salesperson;

pub use catalog::{
    NamedEntity, NewProduct, PriceInput, Product, ProductStatus, ProductUpdate, Salesperson,
};
