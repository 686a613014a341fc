//! # atelier-storage
//!
//! Storage abstraction layer for the Atelier content backend.
//!
//! This crate defines the traits and types that all storage backends must implement.
//! It does not contain any implementations - those are provided by separate crates
//! (`atelier-db-memory`, `atelier-db-postgres`).
//!
//! ## Overview
//!
//! The main trait is [`SectionStore`], which exposes, per section type:
//! - listing and reading section items
//! - upserting and deleting items
//! - reading and upserting the section's settings record
//! - transactions ([`SectionTransaction`]) grouping several mutations
//!
//! ## Example
//!
//! ```ignore
//! use atelier_core::SectionType;
//! use atelier_storage::{SectionStore, StorageError};
//!
//! async fn visible_items(
//!     store: &dyn SectionStore,
//! ) -> Result<Vec<SectionItem>, StorageError> {
//!     let items = store.list_items(SectionType::Store).await?;
//!     Ok(items.into_iter().filter(|item| item.is_active).collect())
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::{SectionStore, SectionTransaction};
pub use types::{SectionItem, SectionSettings, SettingsFields};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynSectionStore = std::sync::Arc<dyn SectionStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use atelier_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::{SectionStore, SectionTransaction};
    pub use crate::types::{SectionItem, SectionSettings, SettingsFields};
    pub use crate::{DynSectionStore, StorageResult};
}
