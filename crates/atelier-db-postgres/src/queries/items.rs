//! Queries against `section_items`.

use std::collections::HashSet;

use atelier_core::SectionType;
use atelier_storage::{SectionItem, StorageError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx_core::executor::Executor;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::Postgres;
use uuid::Uuid;

use super::{chrono_to_time, time_to_chrono};
use crate::error::query_error;

type ItemRow = (Uuid, String, Value, i32, bool, DateTime<Utc>, DateTime<Utc>);

const ITEM_COLUMNS: &str = r#"id, section_type, data, "order", is_active, created_at, updated_at"#;

fn from_row(row: ItemRow) -> Result<SectionItem, StorageError> {
    let (id, section_type, data, order, is_active, created_at, updated_at) = row;
    Ok(SectionItem {
        id,
        section_type: section_type
            .parse()
            .map_err(|e| StorageError::invalid_data(format!("item {id}: {e}")))?,
        data,
        order: u32::try_from(order)
            .map_err(|_| StorageError::invalid_data(format!("item {id}: negative order {order}")))?,
        is_active,
        created_at: chrono_to_time(created_at),
        updated_at: chrono_to_time(updated_at),
    })
}

/// Lists every item of a section, ascending by `order`.
pub async fn list<'e, E>(
    executor: E,
    section_type: SectionType,
) -> Result<Vec<SectionItem>, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"SELECT {ITEM_COLUMNS} FROM section_items
           WHERE section_type = $1
           ORDER BY "order", created_at"#
    );
    let rows: Vec<ItemRow> = query_as(&sql)
        .bind(section_type.as_str())
        .fetch_all(executor)
        .await
        .map_err(|e| query_error("list section items", e))?;

    rows.into_iter().map(from_row).collect()
}

/// Reads one item of a section.
pub async fn get<'e, E>(
    executor: E,
    section_type: SectionType,
    id: Uuid,
) -> Result<Option<SectionItem>, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT {ITEM_COLUMNS} FROM section_items WHERE section_type = $1 AND id = $2");
    let row: Option<ItemRow> = query_as(&sql)
        .bind(section_type.as_str())
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| query_error("read section item", e))?;

    row.map(from_row).transpose()
}

/// Inserts or updates an item. An existing row keeps its `created_at`; a row
/// owned by another section is left untouched and reported as a conflict.
pub async fn upsert<'e, E>(executor: E, item: &SectionItem) -> Result<SectionItem, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    let order = i32::try_from(item.order)
        .map_err(|_| StorageError::invalid_data(format!("order {} out of range", item.order)))?;

    let sql = format!(
        r#"INSERT INTO section_items ({ITEM_COLUMNS})
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           ON CONFLICT (id) DO UPDATE SET
               data = EXCLUDED.data,
               "order" = EXCLUDED."order",
               is_active = EXCLUDED.is_active,
               updated_at = EXCLUDED.updated_at
           WHERE section_items.section_type = EXCLUDED.section_type
           RETURNING {ITEM_COLUMNS}"#
    );
    let row: Option<ItemRow> = query_as(&sql)
        .bind(item.id)
        .bind(item.section_type.as_str())
        .bind(&item.data)
        .bind(order)
        .bind(item.is_active)
        .bind(time_to_chrono(item.created_at))
        .bind(time_to_chrono(item.updated_at))
        .fetch_optional(executor)
        .await
        .map_err(|e| query_error("upsert section item", e))?;

    match row {
        Some(row) => from_row(row),
        None => Err(StorageError::conflict(format!(
            "item {} belongs to a section other than '{}'",
            item.id, item.section_type
        ))),
    }
}

/// Deletes the given ids within a section and returns the removed row count.
pub async fn delete<'e, E>(
    executor: E,
    section_type: SectionType,
    ids: &HashSet<Uuid>,
) -> Result<u64, StorageError>
where
    E: Executor<'e, Database = Postgres>,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let ids: Vec<Uuid> = ids.iter().copied().collect();
    let result = query("DELETE FROM section_items WHERE section_type = $1 AND id = ANY($2)")
        .bind(section_type.as_str())
        .bind(ids)
        .execute(executor)
        .await
        .map_err(|e| query_error("delete section items", e))?;

    Ok(result.rows_affected())
}
