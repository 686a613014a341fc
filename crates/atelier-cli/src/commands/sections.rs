use std::fs;

use anyhow::{Context, Result};
use atelier_core::SectionType;
use colored::Colorize;
use serde_json::{Map, Value, json};

use crate::cli::{ExportArgs, OutputFormat, SaveArgs};
use crate::client::AtelierClient;
use crate::output::{print_json, print_success, print_value};

const SETTINGS_KEYS: [&str; 6] = [
    "section_title",
    "section_description",
    "badge_text",
    "max_items",
    "is_active",
    "display_order",
];

pub async fn list(client: &AtelierClient, format: OutputFormat) -> Result<()> {
    let sections = client.sections().await?;
    print_value(&sections, format);
    Ok(())
}

pub async fn show(client: &AtelierClient, section: SectionType, format: OutputFormat) -> Result<()> {
    let detail = client.section(section).await?;
    print_value(&detail, format);
    Ok(())
}

pub async fn export(client: &AtelierClient, args: &ExportArgs) -> Result<()> {
    let detail = client.section(args.section).await?;
    let body = submission_from_detail(&detail)?;
    match &args.file {
        Some(path) => {
            let text = serde_json::to_string_pretty(&body)?;
            fs::write(path, text).with_context(|| format!("Failed to write file: {path}"))?;
            print_success(&format!("Exported {} to {}", args.section.as_str().cyan(), path));
        }
        None => print_json(&body),
    }
    Ok(())
}

pub async fn save(client: &AtelierClient, args: &SaveArgs, format: OutputFormat) -> Result<()> {
    let mut body = super::read_json(args.file.as_deref())?;
    let obj = body
        .as_object_mut()
        .context("Save body must be a JSON object with `items` and `settings`")?;
    if args.delete_missing {
        obj.insert("delete_missing".into(), Value::Bool(true));
    }

    let resp = client.save_section(args.section, &body).await?;
    let message = resp
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Saved");
    print_success(&format!("{}: {message}", args.section.as_str().cyan()));
    if matches!(format, OutputFormat::Json) {
        print_value(&resp, format);
    }
    Ok(())
}

/// Turns an admin section view into a body `save` accepts: items in order
/// with their stored ids, and the editable settings fields.
fn submission_from_detail(detail: &Value) -> Result<Value> {
    let items = detail
        .get("items")
        .and_then(Value::as_array)
        .context("Response has no items")?
        .iter()
        .map(|item| {
            json!({
                "id": item.get("id").cloned().unwrap_or(Value::Null),
                "data": item.get("data").cloned().unwrap_or_else(|| json!({})),
                "is_active": item.get("is_active").cloned().unwrap_or(Value::Bool(true)),
            })
        })
        .collect::<Vec<_>>();

    let settings = match detail.get("settings").filter(|s| !s.is_null()) {
        Some(stored) => {
            let mut fields = Map::new();
            for key in SETTINGS_KEYS {
                if let Some(value) = stored.get(key) {
                    fields.insert(key.to_string(), value.clone());
                }
            }
            Value::Object(fields)
        }
        None => {
            let label = detail.get("label").cloned().unwrap_or_else(|| json!(""));
            let max = detail.get("max_items").cloned().unwrap_or_else(|| json!(1));
            json!({ "section_title": label, "max_items": max, "is_active": true, "display_order": 0 })
        }
    };

    Ok(json!({ "items": items, "settings": settings }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_keeps_ids_and_settings_fields() {
        let detail = json!({
            "section_type": "store",
            "label": "Store",
            "max_items": 24,
            "settings": {
                "id": "5f0c5e58-6a1f-4a61-9c3b-3a4f1d4b2b10",
                "section_type": "store",
                "section_title": "Shop",
                "section_description": "",
                "badge_text": "New",
                "max_items": 6,
                "is_active": true,
                "display_order": 2,
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z"
            },
            "items": [
                { "id": "a", "section_type": "store", "order": 0, "is_active": false, "data": { "title": "Vase" } }
            ]
        });

        let body = submission_from_detail(&detail).unwrap();
        assert_eq!(body["items"][0], json!({ "id": "a", "data": { "title": "Vase" }, "is_active": false }));
        assert_eq!(body["settings"]["badge_text"], "New");
        assert_eq!(body["settings"]["display_order"], 2);
        assert!(body["settings"].get("id").is_none());
        assert!(body["settings"].get("created_at").is_none());
    }

    #[test]
    fn export_without_settings_uses_section_defaults() {
        let detail = json!({ "label": "Memories", "max_items": 30, "settings": null, "items": [] });
        let body = submission_from_detail(&detail).unwrap();
        assert_eq!(body["settings"]["section_title"], "Memories");
        assert_eq!(body["settings"]["max_items"], 30);
        assert_eq!(body["items"], json!([]));
    }

    #[test]
    fn export_rejects_non_section_response() {
        assert!(submission_from_detail(&json!({ "status": "ok" })).is_err());
    }
}
