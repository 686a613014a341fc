//! Storage traits for the section storage abstraction layer.
//!
//! This module defines the core traits that all storage backends must implement.

use std::collections::HashSet;

use async_trait::async_trait;
use atelier_core::SectionType;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{SectionItem, SectionSettings, SettingsFields};

/// The main storage trait that all section storage backends must implement.
///
/// Every method is scoped to a single section type. Implementations must be
/// thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use atelier_storage::{SectionStore, StorageError};
///
/// async fn get_item(store: &dyn SectionStore, id: Uuid) -> Result<SectionItem, StorageError> {
///     store
///         .get_item(SectionType::Store, id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("store", id.to_string()))
/// }
/// ```
#[async_trait]
pub trait SectionStore: Send + Sync {
    // ==================== Items ====================

    /// Lists all items of a section (active and inactive), ascending by `order`.
    async fn list_items(&self, section_type: SectionType) -> Result<Vec<SectionItem>, StorageError>;

    /// Reads one item of a section.
    ///
    /// Returns `None` if no item with this id exists in the section.
    async fn get_item(
        &self,
        section_type: SectionType,
        id: Uuid,
    ) -> Result<Option<SectionItem>, StorageError>;

    /// Inserts the item if its id is unknown, otherwise updates `data`, `order`,
    /// `is_active` and `updated_at` of the existing row. `created_at` of an
    /// existing row is preserved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id belongs to another section.
    async fn upsert_item(&self, item: &SectionItem) -> Result<SectionItem, StorageError>;

    /// Hard-deletes the given items of a section. Ids not present in the section
    /// are ignored. Returns the number of removed rows.
    async fn delete_items(
        &self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError>;

    // ==================== Settings ====================

    /// Reads the settings record of a section, if one was ever saved.
    async fn get_settings(
        &self,
        section_type: SectionType,
    ) -> Result<Option<SectionSettings>, StorageError>;

    /// Lists every saved settings record.
    async fn list_settings(&self) -> Result<Vec<SectionSettings>, StorageError>;

    /// Creates or replaces the settings record of a section.
    async fn upsert_settings(
        &self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError>;

    // ==================== Transactions ====================

    /// Begins a new transaction.
    ///
    /// The transaction must be either committed or rolled back.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if a transaction cannot be started.
    async fn begin_transaction(&self) -> Result<Box<dyn SectionTransaction>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// A transaction for applying several section mutations atomically.
///
/// Changes are invisible to other readers until `commit`, and a commit is
/// published as a whole: a concurrent store read sees either none or all of
/// it. Reads through the transaction see its own uncommitted changes.
/// Dropping a transaction without committing discards it.
///
/// # Example
///
/// ```ignore
/// let mut tx = store.begin_transaction().await?;
/// tx.upsert_item(&item).await?;
/// tx.upsert_settings(SectionType::Store, &fields).await?;
/// tx.commit().await?;
/// ```
#[async_trait]
pub trait SectionTransaction: Send + Sync {
    /// Commits all operations in this transaction.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discards all operations in this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;

    /// See `SectionStore::list_items`.
    async fn list_items(
        &mut self,
        section_type: SectionType,
    ) -> Result<Vec<SectionItem>, StorageError>;

    /// See `SectionStore::upsert_item`.
    async fn upsert_item(&mut self, item: &SectionItem) -> Result<SectionItem, StorageError>;

    /// See `SectionStore::delete_items`.
    async fn delete_items(
        &mut self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError>;

    /// See `SectionStore::upsert_settings`.
    async fn upsert_settings(
        &mut self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError>;
}
