//! In-memory section storage backend for the Atelier server.
//!
//! This crate provides an in-memory implementation of the `SectionStore` trait
//! from `atelier-storage`, using papaya lock-free HashMaps for concurrent access.
//! Nothing survives a restart; it backs development setups and tests.
//!
//! # Example
//!
//! ```ignore
//! use atelier_db_memory::InMemoryStore;
//! use atelier_storage::SectionStore;
//!
//! let store = InMemoryStore::new();
//! let items = store.list_items(SectionType::Store).await?;
//! ```

mod storage;
mod transaction;

pub use atelier_storage::{DynSectionStore, SectionStore, StorageError};
pub use storage::InMemoryStore;
pub use transaction::InMemoryTransaction;

/// Creates a new shareable in-memory store.
pub fn create_store() -> DynSectionStore {
    std::sync::Arc::new(InMemoryStore::new())
}
