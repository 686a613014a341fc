use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use atelier_core::SectionType;
use atelier_storage::{
    SectionItem, SectionSettings, SectionStore, SectionTransaction, SettingsFields, StorageError,
};
use papaya::HashMap as PapayaHashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::transaction::InMemoryTransaction;

/// In-memory section storage backend using papaya lock-free HashMaps.
///
/// Items are keyed by id and carry their section type; settings are keyed by
/// section type. Clones share the same underlying maps.
///
/// Reads hold `publish_lock` shared and every write holds it exclusively, so
/// a committed transaction becomes visible all at once.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(crate) items: Arc<PapayaHashMap<Uuid, SectionItem>>,
    pub(crate) settings: Arc<PapayaHashMap<SectionType, SectionSettings>>,
    /// Shared by readers, exclusive for writes and commits.
    pub(crate) publish_lock: Arc<RwLock<()>>,
}

impl InMemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.items.pin().len()
    }

    pub(crate) fn section_items(&self, section_type: SectionType) -> Vec<SectionItem> {
        let guard = self.items.pin();
        guard
            .values()
            .filter(|item| item.section_type == section_type)
            .cloned()
            .collect()
    }
}

/// Merges an incoming item with the row it replaces, if any.
pub(crate) fn merge_item(
    existing: Option<&SectionItem>,
    incoming: &SectionItem,
) -> Result<SectionItem, StorageError> {
    match existing {
        Some(current) if current.section_type != incoming.section_type => {
            Err(StorageError::conflict(format!(
                "item {} belongs to section '{}', not '{}'",
                incoming.id, current.section_type, incoming.section_type
            )))
        }
        Some(current) => Ok(SectionItem {
            created_at: current.created_at,
            ..incoming.clone()
        }),
        None => Ok(incoming.clone()),
    }
}

/// Builds the settings row that replaces `existing`, keeping its identity.
pub(crate) fn merge_settings(
    existing: Option<&SectionSettings>,
    section_type: SectionType,
    fields: &SettingsFields,
) -> SectionSettings {
    let now = atelier_core::now_utc();
    match existing {
        Some(current) => SectionSettings {
            id: current.id,
            section_type,
            fields: fields.clone(),
            created_at: current.created_at,
            updated_at: now,
        },
        None => SectionSettings {
            id: atelier_core::generate_id(),
            section_type,
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
        },
    }
}

pub(crate) fn sort_by_order(items: &mut [SectionItem]) {
    items.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
}

#[async_trait]
impl SectionStore for InMemoryStore {
    async fn list_items(&self, section_type: SectionType) -> Result<Vec<SectionItem>, StorageError> {
        let _read = self.publish_lock.read().await;
        let mut items = self.section_items(section_type);
        sort_by_order(&mut items);
        Ok(items)
    }

    async fn get_item(
        &self,
        section_type: SectionType,
        id: Uuid,
    ) -> Result<Option<SectionItem>, StorageError> {
        let _read = self.publish_lock.read().await;
        let guard = self.items.pin();
        Ok(guard
            .get(&id)
            .filter(|item| item.section_type == section_type)
            .cloned())
    }

    async fn upsert_item(&self, item: &SectionItem) -> Result<SectionItem, StorageError> {
        let _write = self.publish_lock.write().await;
        let guard = self.items.pin();
        let merged = merge_item(guard.get(&item.id), item)?;
        guard.insert(merged.id, merged.clone());
        Ok(merged)
    }

    async fn delete_items(
        &self,
        section_type: SectionType,
        ids: &HashSet<Uuid>,
    ) -> Result<u64, StorageError> {
        let _write = self.publish_lock.write().await;
        let guard = self.items.pin();
        let mut removed = 0;
        for id in ids {
            let matches = guard
                .get(id)
                .is_some_and(|item| item.section_type == section_type);
            if matches && guard.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn get_settings(
        &self,
        section_type: SectionType,
    ) -> Result<Option<SectionSettings>, StorageError> {
        let _read = self.publish_lock.read().await;
        Ok(self.settings.pin().get(&section_type).cloned())
    }

    async fn list_settings(&self) -> Result<Vec<SectionSettings>, StorageError> {
        let _read = self.publish_lock.read().await;
        let guard = self.settings.pin();
        let mut all: Vec<SectionSettings> = guard.values().cloned().collect();
        all.sort_by_key(|s| (s.fields.display_order, s.section_type));
        Ok(all)
    }

    async fn upsert_settings(
        &self,
        section_type: SectionType,
        fields: &SettingsFields,
    ) -> Result<SectionSettings, StorageError> {
        let _write = self.publish_lock.write().await;
        let guard = self.settings.pin();
        let merged = merge_settings(guard.get(&section_type), section_type, fields);
        guard.insert(section_type, merged.clone());
        Ok(merged)
    }

    async fn begin_transaction(&self) -> Result<Box<dyn SectionTransaction>, StorageError> {
        Ok(Box::new(InMemoryTransaction::new(self.clone())))
    }

    fn backend_name(&self) -> &'static str {
        "in-memory-papaya"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(section_type: SectionType, order: u32) -> SectionItem {
        SectionItem::new(
            section_type,
            json!({ "title": format!("item {order}") }),
            order,
            true,
            atelier_core::now_utc(),
        )
    }

    fn fields(title: &str) -> SettingsFields {
        SettingsFields {
            section_title: title.to_string(),
            section_description: String::new(),
            badge_text: String::new(),
            max_items: 6,
            is_active: true,
            display_order: 0,
        }
    }

    #[tokio::test]
    async fn test_list_items_sorted_and_partitioned() {
        let store = InMemoryStore::new();
        store.upsert_item(&item(SectionType::Store, 2)).await.unwrap();
        store.upsert_item(&item(SectionType::Store, 0)).await.unwrap();
        store.upsert_item(&item(SectionType::News, 1)).await.unwrap();

        let store_items = store.list_items(SectionType::Store).await.unwrap();
        let orders: Vec<u32> = store_items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 2]);

        let news = store.list_items(SectionType::News).await.unwrap();
        assert_eq!(news.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_preserves_created_at() {
        let store = InMemoryStore::new();
        let original = store.upsert_item(&item(SectionType::Artist, 0)).await.unwrap();

        let mut changed = original.clone();
        changed.data = json!({ "label": "Years", "value": "12" });
        changed.created_at = atelier_core::now_utc() + time::Duration::days(1);
        changed.order = 4;
        let updated = store.upsert_item(&changed).await.unwrap();

        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.order, 4);
        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_cross_section_id() {
        let store = InMemoryStore::new();
        let stored = store.upsert_item(&item(SectionType::Store, 0)).await.unwrap();

        let mut hijack = stored.clone();
        hijack.section_type = SectionType::News;
        let err = store.upsert_item(&hijack).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_delete_items_ignores_other_sections() {
        let store = InMemoryStore::new();
        let a = store.upsert_item(&item(SectionType::Store, 0)).await.unwrap();
        let b = store.upsert_item(&item(SectionType::News, 0)).await.unwrap();

        let ids: HashSet<Uuid> = [a.id, b.id].into_iter().collect();
        let removed = store.delete_items(SectionType::Store, &ids).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get_item(SectionType::News, b.id).await.unwrap().is_some());
        assert!(store.get_item(SectionType::Store, a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_item_wrong_section_is_none() {
        let store = InMemoryStore::new();
        let a = store.upsert_item(&item(SectionType::Store, 0)).await.unwrap();
        assert!(store.get_item(SectionType::Memories, a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_upsert_keeps_identity() {
        let store = InMemoryStore::new();
        let first = store
            .upsert_settings(SectionType::Workshop, &fields("Studio"))
            .await
            .unwrap();
        let second = store
            .upsert_settings(SectionType::Workshop, &fields("In the studio"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert!(second.updated_at.offset().is_utc());
        assert_eq!(second.fields.section_title, "In the studio");
        assert_eq!(store.list_settings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_name() {
        let store = InMemoryStore::new();
        assert_eq!(store.backend_name(), "in-memory-papaya");
    }
}
