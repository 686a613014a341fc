use anyhow::Result;
use colored::Colorize;

use crate::cli::{OutputFormat, PageArgs};
use crate::client::AtelierClient;
use crate::output::print_value;

pub async fn status(client: &AtelierClient, server: &str) -> Result<()> {
    let (code, _) = client.probe("/healthz").await?;
    if code != 200 {
        println!(
            "{} {} returned {} {}",
            "✗".red(),
            server.cyan(),
            code.to_string().red(),
            "(not healthy)".red()
        );
        return Ok(());
    }
    println!("{} {} is {}", "✓".green(), server.cyan(), "healthy".green());

    let (code, body) = client.probe("/readyz").await?;
    if code == 200 {
        println!("  {}: {}", "ready".green(), body);
    } else {
        println!("  {} ({}): {}", "not ready".yellow(), code, body);
    }
    Ok(())
}

pub async fn page(client: &AtelierClient, args: &PageArgs, format: OutputFormat) -> Result<()> {
    let view = client.page(&args.locale, args.page.as_deref()).await?;

    if matches!(format, OutputFormat::Table) {
        let page = view.get("page").and_then(|v| v.as_str()).unwrap_or("home");
        println!("{}: {} ({})", "Page".cyan(), page, args.locale);
        let sections = view
            .get("sections")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for section in sections {
            let label = section.get("label").and_then(|v| v.as_str()).unwrap_or("?");
            let title = section
                .pointer("/settings/section_title")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let count = section
                .get("items")
                .and_then(|v| v.as_array())
                .map_or(0, Vec::len);
            println!("  {} {} ({count} items)", label.cyan(), title);
        }
    } else {
        print_value(&view, format);
    }
    Ok(())
}
