//! Catalog storage and repositories.
//! - `storage`: the collection contract and its file, key-value and relational backends.
//! - `services`: per-entity repositories plus the public catalog view.

pub mod errors;
pub mod services;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use services::Catalog;
