use anyhow::Result;
use colored::Colorize;
use serde_json::{Map, Value};

use crate::cli::{ItemDeleteArgs, ItemUpdateArgs, OutputFormat};
use crate::client::AtelierClient;
use crate::output::{print_success, print_value};

pub async fn update(client: &AtelierClient, args: &ItemUpdateArgs, format: OutputFormat) -> Result<()> {
    let mut patch = Map::new();
    if let Some(path) = &args.data {
        patch.insert("data".into(), super::read_json(Some(path))?);
    }
    if let Some(active) = args.active {
        patch.insert("is_active".into(), Value::Bool(active));
    }
    if patch.is_empty() {
        anyhow::bail!("Nothing to update: pass --data and/or --active");
    }

    let resp = client
        .update_item(args.section, &args.id, &Value::Object(patch))
        .await?;
    print_success(&format!(
        "Updated {}/{}",
        args.section.as_str().cyan(),
        args.id.cyan()
    ));
    if let Some(item) = resp.get("item") {
        print_value(item, format);
    }
    Ok(())
}

pub async fn delete(client: &AtelierClient, args: &ItemDeleteArgs) -> Result<()> {
    client.delete_item(args.section, &args.id).await?;
    print_success(&format!(
        "Deleted {}/{}",
        args.section.as_str().cyan(),
        args.id.cyan()
    ));
    Ok(())
}
