use atelier_storage::SettingsFields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a section save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSubmission {
    #[serde(default)]
    pub items: Vec<ItemDraft>,
    pub settings: SettingsFields,
    /// Delete stored items missing from `items` even when no submitted id
    /// refers to a stored item. Without it such a save never deletes.
    #[serde(default)]
    pub delete_missing: bool,
}

/// One submitted item. Its position in `items` becomes its `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Stored id, a `temp-` placeholder, or absent for new items.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Ignored.
    #[serde(default, skip_serializing)]
    pub order: Option<i64>,
}

fn default_active() -> bool {
    true
}

/// Partial update of one stored item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
