//! PostgreSQL transaction implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use atelier_core::SectionType;
use atelier_storage::{
    SectionItem, SectionSettings, SectionTransaction, SettingsFields, StorageError,
};
use sqlx_postgres::PgTransaction;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::queries;

/// Wraps an sqlx PostgreSQL transaction.
///
/// The inner transaction is an `Option` so commit/rollback can take
/// ownership of it; sqlx rolls back automatically if it is dropped unfinished.
pub struct PostgresTransaction {
    tx: Mutex<Option<Box<PgTransaction<'static>>>>,
}

impl PostgresTransaction {
    pub fn new(tx: PgTransaction<'static>) -> Self {
        Self {
            tx: Mutex::new(Some(Box::new(tx))),
        }
    }

    fn open(&mut self) -> Result<&mut PgTransaction<'static>, StorageError> {
        self.tx.get_mut().as_deref_mut().ok_or_else(|| {
            StorageError::transaction_error("Transaction already completed (committed or rolled back)")
        })
    }
}

#[async_trait]
impl SectionTransaction for PostgresTransaction {
    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.get_mut().take() {
            tx.commit().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to commit transaction: {e}"))
            })?;
            tracing::debug!("Transaction committed");
        }
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.get_mut().take() {
            tx.rollback().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to rollback transaction: {e}"))
            })?;
            tracing::debug!("Transaction rolled back");
        }
        Ok(())
    }

    async fn list_items(
        &mut self,
        section_type: SectionType,
    ) -> Result<Vec<SectionItem>, StorageError> {
        let tx = self.open()?;
        queries::items::list(&mut **tx, section_type).await
    }

    async fn upsert_item(&mut self, item: &SectionItem) -> Result<SectionItem, StorageError> {
        let tx = self.open()?;
        queries::items::upsert(&mut **tx, item).await
    }

    async fn delete_items(
        &mut self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError> {
        let tx = self.open()?;
        queries::items::delete(&mut **tx, section_type, ids).await
    }

    async fn upsert_settings(
        &mut self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError> {
        let tx = self.open()?;
        queries::settings::upsert(&mut **tx, section_type, fields).await
    }
}

impl Drop for PostgresTransaction {
    fn drop(&mut self) {
        if self.tx.get_mut().is_some() {
            tracing::warn!("PostgresTransaction dropped without commit/rollback; rolling back");
        }
    }
}
