//! PostgreSQL implementation of the SectionStore trait.

use std::collections::HashSet;

use async_trait::async_trait;
use atelier_core::SectionType;
use atelier_storage::{
    SectionItem, SectionSettings, SectionStore, SectionTransaction, SettingsFields, StorageError,
};
use sqlx_postgres::PgPool;
use uuid::Uuid;

use crate::config::PostgresConfig;
use crate::queries;
use crate::transaction::PostgresTransaction;
use crate::{migrations, pool};

/// PostgreSQL storage backend for section content.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new `PostgresStore` with the given configuration.
    ///
    /// This will create a connection pool and run migrations if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStore` from an existing connection pool.
    /// Migrations are not run.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Checks that the database answers queries.
    pub async fn ping(&self) -> Result<(), StorageError> {
        pool::ping(&self.pool).await.map_err(StorageError::from)
    }
}

#[async_trait]
impl SectionStore for PostgresStore {
    async fn list_items(&self, section_type: SectionType) -> Result<Vec<SectionItem>, StorageError> {
        queries::items::list(&self.pool, section_type).await
    }

    async fn get_item(
        &self,
        section_type: SectionType,
        id: Uuid,
    ) -> Result<Option<SectionItem>, StorageError> {
        queries::items::get(&self.pool, section_type, id).await
    }

    async fn upsert_item(&self, item: &SectionItem) -> Result<SectionItem, StorageError> {
        queries::items::upsert(&self.pool, item).await
    }

    async fn delete_items(
        &self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError> {
        queries::items::delete(&self.pool, section_type, ids).await
    }

    async fn get_settings(
        &self,
        section_type: SectionType,
    ) -> Result<Option<SectionSettings>, StorageError> {
        queries::settings::get(&self.pool, section_type).await
    }

    async fn list_settings(&self) -> Result<Vec<SectionSettings>, StorageError> {
        queries::settings::list(&self.pool).await
    }

    async fn upsert_settings(
        &self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError> {
        queries::settings::upsert(&self.pool, section_type, fields).await
    }

    async fn begin_transaction(&self) -> Result<Box<dyn SectionTransaction>, StorageError> {
        let tx = self.pool.begin().await.map_err(|e| {
            StorageError::transaction_error(format!("Failed to begin transaction: {e}"))
        })?;
        Ok(Box::new(PostgresTransaction::new(tx)))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
