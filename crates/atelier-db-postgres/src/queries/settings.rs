//! Queries against `section_settings`.

use atelier_core::SectionType;
use atelier_storage::{SectionSettings, SettingsFields, StorageError};
use chrono::{DateTime, Utc};
use sqlx_core::executor::Executor;
use sqlx_core::query_as::query_as;
use sqlx_postgres::Postgres;
use uuid::Uuid;

use super::chrono_to_time;
use crate::error::query_error;

type SettingsRow = (
    Uuid,
    String,
    String,
    String,
    String,
    i32,
    bool,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
);

const SETTINGS_COLUMNS: &str = "id, section_type, section_title, section_description, badge_text, \
                                max_items, is_active, display_order, created_at, updated_at";

fn from_row(row: SettingsRow) -> Result<SectionSettings, StorageError> {
    let (
        id,
        section_type,
        section_title,
        section_description,
        badge_text,
        max_items,
        is_active,
        display_order,
        created_at,
        updated_at,
    ) = row;
    Ok(SectionSettings {
        id,
        section_type: section_type
            .parse()
            .map_err(|e| StorageError::invalid_data(format!("settings {id}: {e}")))?,
        fields: SettingsFields {
            section_title,
            section_description,
            badge_text,
            max_items,
            is_active,
            display_order,
        },
        created_at: chrono_to_time(created_at),
        updated_at: chrono_to_time(updated_at),
    })
}

/// Reads the settings row of a section.
pub async fn get<'e, E>(
    executor: E,
    section_type: SectionType,
) -> Result<Option<SectionSettings>, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT {SETTINGS_COLUMNS} FROM section_settings WHERE section_type = $1");
    let row: Option<SettingsRow> = query_as(&sql)
        .bind(section_type.as_str())
        .fetch_optional(executor)
        .await
        .map_err(|e| query_error("read section settings", e))?;

    row.map(from_row).transpose()
}

/// Lists all settings rows ordered by `display_order`.
pub async fn list<'e, E>(executor: E) -> Result<Vec<SectionSettings>, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT {SETTINGS_COLUMNS} FROM section_settings ORDER BY display_order, section_type"
    );
    let rows: Vec<SettingsRow> = query_as(&sql)
        .fetch_all(executor)
        .await
        .map_err(|e| query_error("list section settings", e))?;

    rows.into_iter().map(from_row).collect()
}

/// Creates or replaces the settings row of a section, keyed by section type.
pub async fn upsert<'e, E>(
    executor: E,
    section_type: SectionType,
    fields: &SettingsFields,
) -> Result<SectionSettings, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"INSERT INTO section_settings ({SETTINGS_COLUMNS})
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
           ON CONFLICT (section_type) DO UPDATE SET
               section_title = EXCLUDED.section_title,
               section_description = EXCLUDED.section_description,
               badge_text = EXCLUDED.badge_text,
               max_items = EXCLUDED.max_items,
               is_active = EXCLUDED.is_active,
               display_order = EXCLUDED.display_order,
               updated_at = NOW()
           RETURNING {SETTINGS_COLUMNS}"#
    );
    let row: SettingsRow = query_as(&sql)
        .bind(atelier_core::generate_id())
        .bind(section_type.as_str())
        .bind(&fields.section_title)
        .bind(&fields.section_description)
        .bind(&fields.badge_text)
        .bind(fields.max_items)
        .bind(fields.is_active)
        .bind(fields.display_order)
        .fetch_one(executor)
        .await
        .map_err(|e| query_error("upsert section settings", e))?;

    from_row(row)
}
