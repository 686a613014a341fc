//! Buffered transactions for the in-memory backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use atelier_core::SectionType;
use atelier_storage::{
    SectionItem, SectionSettings, SectionTransaction, SettingsFields, StorageError,
};
use uuid::Uuid;

use crate::storage::{InMemoryStore, merge_item, merge_settings, sort_by_order};

/// In-memory transaction.
///
/// Mutations are staged locally and overlaid on reads made through the
/// transaction. `commit` publishes them while holding the store's publish
/// lock exclusively, so readers see all of them or none; dropping or rolling
/// back discards them.
pub struct InMemoryTransaction {
    store: InMemoryStore,
    /// `None` marks a staged delete.
    staged_items: HashMap<Uuid, Option<SectionItem>>,
    staged_settings: HashMap<SectionType, SectionSettings>,
}

impl InMemoryTransaction {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged_items: HashMap::new(),
            staged_settings: HashMap::new(),
        }
    }

    /// Current view of one item: staged state first, then the store.
    fn visible(&self, id: &Uuid) -> Option<SectionItem> {
        match self.staged_items.get(id) {
            Some(staged) => staged.clone(),
            None => self.store.items.pin().get(id).cloned(),
        }
    }
}

#[async_trait]
impl SectionTransaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let _write = self.store.publish_lock.write().await;

        let items = self.store.items.pin();
        for (id, staged) in self.staged_items {
            match staged {
                Some(item) => {
                    items.insert(id, item);
                }
                None => {
                    items.remove(&id);
                }
            }
        }

        let settings = self.store.settings.pin();
        for (section_type, row) in self.staged_settings {
            settings.insert(section_type, row);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }

    async fn list_items(
        &mut self,
        section_type: SectionType,
    ) -> Result<Vec<SectionItem>, StorageError> {
        let _read = self.store.publish_lock.read().await;
        let mut items: Vec<SectionItem> = self
            .store
            .section_items(section_type)
            .into_iter()
            .filter(|item| !self.staged_items.contains_key(&item.id))
            .collect();
        items.extend(
            self.staged_items
                .values()
                .flatten()
                .filter(|item| item.section_type == section_type)
                .cloned(),
        );
        sort_by_order(&mut items);
        Ok(items)
    }

    async fn upsert_item(&mut self, item: &SectionItem) -> Result<SectionItem, StorageError> {
        let _read = self.store.publish_lock.read().await;
        let merged = merge_item(self.visible(&item.id).as_ref(), item)?;
        self.staged_items.insert(merged.id, Some(merged.clone()));
        Ok(merged)
    }

    async fn delete_items(
        &mut self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError> {
        let _read = self.store.publish_lock.read().await;
        let mut removed = 0;
        for id in ids {
            if self
                .visible(id)
                .is_some_and(|item| item.section_type == section_type)
            {
                self.staged_items.insert(*id, None);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn upsert_settings(
        &mut self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError> {
        let _read = self.store.publish_lock.read().await;
        let existing = match self.staged_settings.get(&section_type) {
            Some(row) => Some(row.clone()),
            None => self.store.settings.pin().get(&section_type).cloned(),
        };
        let merged = merge_settings(existing.as_ref(), section_type, fields);
        self.staged_settings.insert(section_type, merged.clone());
        Ok(merged)
    }
}
