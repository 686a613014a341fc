//! Row types shared by all storage backends.

use atelier_core::SectionType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// A persisted section item.
///
/// `data` is the section-specific payload; storage never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    /// Stable identifier, assigned on insert.
    pub id: Uuid,
    /// Partition key.
    pub section_type: SectionType,
    /// Opaque payload.
    pub data: Value,
    /// Zero-based display position within the section.
    pub order: u32,
    /// Visibility flag for public pages.
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SectionItem {
    /// Builds a not-yet-persisted item with a fresh id.
    pub fn new(
        section_type: SectionType,
        data: Value,
        order: u32,
        is_active: bool,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: atelier_core::generate_id(),
            section_type,
            data,
            order,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Editable settings of a section, as submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFields {
    pub section_title: String,
    #[serde(default)]
    pub section_description: String,
    #[serde(default)]
    pub badge_text: String,
    pub max_items: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

fn default_true() -> bool {
    true
}

/// The persisted settings record, one per section type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSettings {
    pub id: Uuid,
    pub section_type: SectionType,
    #[serde(flatten)]
    pub fields: SettingsFields,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_fields_defaults() {
        let fields: SettingsFields = serde_json::from_value(json!({
            "section_title": "Shop",
            "max_items": 6
        }))
        .unwrap();

        assert_eq!(fields.section_description, "");
        assert_eq!(fields.badge_text, "");
        assert!(fields.is_active);
        assert_eq!(fields.display_order, 0);
    }

    #[test]
    fn settings_serialize_flat() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let settings = SectionSettings {
            id: Uuid::nil(),
            section_type: SectionType::News,
            fields: SettingsFields {
                section_title: "Press".into(),
                section_description: String::new(),
                badge_text: "New".into(),
                max_items: 4,
                is_active: true,
                display_order: 2,
            },
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["section_type"], "news");
        assert_eq!(value["section_title"], "Press");
        assert_eq!(value["display_order"], 2);
        assert_eq!(value["created_at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn new_item_has_matching_timestamps() {
        let now = OffsetDateTime::now_utc();
        let item = SectionItem::new(SectionType::Store, json!({"title": "Print"}), 3, true, now);
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.order, 3);
        assert_eq!(item.section_type, SectionType::Store);
    }
}
