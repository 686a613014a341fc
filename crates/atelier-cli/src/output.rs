use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_as_table(value),
    }
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_as_table(value: &Value) {
    if let Some(summaries) = value.as_array() {
        println!("{}", summary_table(summaries));
    } else if let Some(items) = value.get("items").and_then(Value::as_array) {
        let label = value.get("label").and_then(Value::as_str).unwrap_or("Section");
        let title = value
            .pointer("/settings/section_title")
            .and_then(Value::as_str)
            .unwrap_or("(no settings)");
        println!("{} {} - {}", "Section:".cyan(), label.cyan(), title);
        if items.is_empty() {
            println!("No items.");
        } else {
            println!("{}", item_table(items));
        }
    } else {
        print_json(value);
    }
}

fn summary_table(summaries: &[Value]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Section", "Label", "Items", "Active", "Max", "Title", "Visible"]);
    for s in summaries {
        let text = |key: &str| s.get(key).map(cell).unwrap_or_else(|| "-".into());
        let settings = s.get("settings").filter(|v| !v.is_null());
        let title = settings
            .and_then(|v| v.get("section_title"))
            .map(cell)
            .unwrap_or_else(|| "-".into());
        let visible = settings
            .and_then(|v| v.get("is_active"))
            .map(cell)
            .unwrap_or_else(|| "-".into());
        builder.push_record([
            text("section_type"),
            text("label"),
            text("item_count"),
            text("active_count"),
            text("max_items"),
            title,
            visible,
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn item_table(items: &[Value]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", "ID", "Active", "Summary"]);
    for item in items {
        let get = |key: &str| item.get(key).map(cell).unwrap_or_else(|| "-".into());
        builder.push_record([get("order"), get("id"), get("is_active"), item_summary(item)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// The most descriptive text field of a payload, truncated.
fn item_summary(item: &Value) -> String {
    const KEYS: [&str; 6] = ["title", "label", "quote", "caption", "alt", "image_url"];
    let data = item.get("data");
    let text = KEYS
        .iter()
        .find_map(|k| data.and_then(|d| d.get(*k)).and_then(Value::as_str))
        .unwrap_or("-");
    truncate(text, 48)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max - 1).collect();
        format!("{head}…")
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}
