mod auth;
mod cli;
mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, ItemCommands, SectionsCommands, TokenCommands};
use client::AtelierClient;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;
    let format = match cli.format {
        Some(format) => format,
        None => profile_format(profile),
    };

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            commands::auth::login(&server, args, profile)?;
        }
        Commands::Logout => {
            commands::auth::logout(profile)?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Token(args) => match &args.command {
            TokenCommands::Mint(mint) => {
                let server = config::resolve_server(&cli.server, profile).ok();
                commands::auth::mint(mint, server, profile)?;
            }
        },
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("json")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(config::normalize_server(&set_args.value)?),
                    "format" => {
                        parse_format(&set_args.value)?;
                        cfg.format = Some(set_args.value.clone());
                    }
                    other => {
                        anyhow::bail!("Unknown config key: {other}. Valid keys: server, format")
                    }
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Status => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            commands::server::status(&client, &server).await?;
        }
        Commands::Page(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            commands::server::page(&client, args, format).await?;
        }
        Commands::Sections(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            match &args.command {
                SectionsCommands::List => commands::sections::list(&client, format).await?,
                SectionsCommands::Show(r) => {
                    commands::sections::show(&client, r.section, format).await?
                }
                SectionsCommands::Export(a) => commands::sections::export(&client, a).await?,
                SectionsCommands::Save(a) => commands::sections::save(&client, a, format).await?,
            }
        }
        Commands::Item(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            match &args.command {
                ItemCommands::Update(a) => commands::item::update(&client, a, format).await?,
                ItemCommands::Delete(a) => commands::item::delete(&client, a).await?,
            }
        }
    }

    Ok(())
}

fn make_client(server: &str, profile: &str) -> Result<AtelierClient> {
    let token = auth::load_credentials(profile)?.map(|c| c.access_token);
    Ok(AtelierClient::new(server, token))
}

fn parse_format(raw: &str) -> Result<cli::OutputFormat> {
    match raw {
        "json" => Ok(cli::OutputFormat::Json),
        "table" => Ok(cli::OutputFormat::Table),
        other => anyhow::bail!("Unknown format: {other}. Valid formats: json, table"),
    }
}

/// Output format saved in the profile, json when unset or unreadable.
fn profile_format(profile: &str) -> cli::OutputFormat {
    config::load_profile(profile)
        .ok()
        .and_then(|cfg| cfg.format)
        .and_then(|f| parse_format(&f).ok())
        .unwrap_or_default()
}
