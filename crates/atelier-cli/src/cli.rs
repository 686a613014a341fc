use atelier_core::SectionType;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier CLI: manage site sections from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and ATELIER_URL env var)
    #[arg(short, long, global = true, env = "ATELIER_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "ATELIER_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a bearer token for the admin API
    Login(LoginArgs),
    /// Logout (remove stored credentials)
    Logout,
    /// Show current auth info
    Whoami,
    /// Mint a signed admin token from the server's shared secret
    Token(TokenArgs),
    /// Inspect and save sections
    Sections(SectionsArgs),
    /// Change or delete a single section item
    Item(ItemArgs),
    /// Fetch a public page as the site renders it
    Page(PageArgs),
    /// Check server health
    Status,
    /// Manage CLI configuration
    Config(ConfigArgs),
}

pub fn parse_section(raw: &str) -> Result<SectionType, String> {
    raw.parse::<SectionType>().map_err(|_| {
        let names: Vec<&str> = SectionType::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown section '{raw}' (expected one of: {})", names.join(", "))
    })
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Bearer token (e.g. from `atelier token mint`)
    #[arg(long, env = "ATELIER_TOKEN")]
    pub token: String,
}

#[derive(clap::Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommands,
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Sign a token with the configured HS256 secret
    Mint(MintArgs),
}

#[derive(clap::Args)]
pub struct MintArgs {
    /// Shared secret (auth.jwt_secret of the server)
    #[arg(long, env = "ATELIER__AUTH__JWT_SECRET", hide_env_values = true)]
    pub secret: String,
    /// Expected issuer (auth.issuer of the server)
    #[arg(long, default_value = "atelier")]
    pub issuer: String,
    /// Token subject
    #[arg(long, default_value = "cli")]
    pub subject: String,
    /// Display name
    #[arg(long)]
    pub username: Option<String>,
    /// Roles to grant (repeatable)
    #[arg(long = "role", default_value = "admin")]
    pub roles: Vec<String>,
    /// Lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    pub ttl: u64,
    /// Store the token as this profile's credentials
    #[arg(long)]
    pub save: bool,
}

#[derive(clap::Args)]
pub struct SectionsArgs {
    #[command(subcommand)]
    pub command: SectionsCommands,
}

#[derive(Subcommand)]
pub enum SectionsCommands {
    /// Summary of every section
    List,
    /// Items and settings of one section
    Show(SectionRef),
    /// Write a section as a save body, ready to edit and `save`
    Export(ExportArgs),
    /// Replace a section's items and settings
    Save(SaveArgs),
}

#[derive(clap::Args)]
pub struct SectionRef {
    /// Section (store, artist, testimonials, memories, workshop, news)
    #[arg(value_parser = parse_section)]
    pub section: SectionType,
}

#[derive(clap::Args)]
pub struct ExportArgs {
    #[arg(value_parser = parse_section)]
    pub section: SectionType,
    /// Output file (stdout if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct SaveArgs {
    #[arg(value_parser = parse_section)]
    pub section: SectionType,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
    /// Delete stored items missing from the file
    #[arg(long)]
    pub delete_missing: bool,
}

#[derive(clap::Args)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommands,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Update an item's payload and/or visibility
    Update(ItemUpdateArgs),
    /// Delete an item
    Delete(ItemDeleteArgs),
}

#[derive(clap::Args)]
pub struct ItemUpdateArgs {
    #[arg(value_parser = parse_section)]
    pub section: SectionType,
    /// Item id
    pub id: String,
    /// JSON file with the new payload
    #[arg(long)]
    pub data: Option<String>,
    /// Show or hide the item
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(clap::Args)]
pub struct ItemDeleteArgs {
    #[arg(value_parser = parse_section)]
    pub section: SectionType,
    /// Item id
    pub id: String,
}

#[derive(clap::Args)]
pub struct PageArgs {
    /// Locale, e.g. en
    pub locale: String,
    /// about, gallery, news or store (home if omitted)
    pub page: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}
