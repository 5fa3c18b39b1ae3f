//! Persistence for the book catalog and visited-book records.

pub mod catalog;
pub mod error;
pub mod models;
pub mod store;

pub use catalog::Catalog;
pub use error::StoreError;
pub use store::{MemoryStore, Retention};
