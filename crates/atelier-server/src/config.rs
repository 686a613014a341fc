use atelier_auth::AuthConfig;
use atelier_db_postgres::PostgresConfig;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Bearer token validation and the admin role list
    #[serde(default)]
    pub auth: AuthConfig,
    /// Public site settings
    #[serde(default)]
    pub site: SiteConfig,
    /// Rendered page cache
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.request_timeout_ms == 0 {
            return Err("server.request_timeout_ms must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Storage validation
        if self.storage.backend == StorageBackend::Postgres {
            match &self.storage.postgres {
                None => return Err("storage.backend=postgres requires [storage.postgres]".into()),
                Some(pg) if pg.url.trim().is_empty() => {
                    return Err("storage.postgres.url must not be empty".into());
                }
                Some(pg) if pg.pool_size == 0 => {
                    return Err("storage.postgres.pool_size must be > 0".into());
                }
                Some(_) => {}
            }
        }
        // Site validation
        if self.site.locales.is_empty() {
            return Err("site.locales must list at least one locale".into());
        }
        if let Some(bad) = self.site.locales.iter().find(|l| !is_locale_tag(l)) {
            return Err(format!("site.locales contains invalid locale '{bad}'"));
        }
        // Cache validation
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err("cache.max_entries must be > 0 when the cache is enabled".into());
        }
        // Auth validation
        self.auth
            .validate()
            .map_err(|e| format!("auth config error: {e}"))?;
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    pub fn render_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.render_ttl_secs)
    }
}

/// `en`, `fr`, `pt-BR` and the like.
fn is_locale_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let lang_ok = parts
        .next()
        .is_some_and(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_lowercase()));
    lang_ok
        && parts.all(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout_ms() -> u64 {
    15_000
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Locales served under `/api/site/{locale}`.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}
fn default_locales() -> Vec<String> {
    vec!["en".into()]
}
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
        }
    }
}

impl SiteConfig {
    pub fn supports(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_render_ttl_secs")]
    pub render_ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}
fn default_cache_enabled() -> bool {
    true
}
fn default_render_ttl_secs() -> u64 {
    300
}
fn default_max_entries() -> usize {
    512
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            render_ttl_secs: default_render_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default config file name, looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "atelier.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        } else if path.is_some() {
            tracing::warn!(path = %pathbuf.display(), "config file not found, using defaults and environment");
        }
        // Environment variable overrides, e.g., ATELIER__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("ATELIER")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.admin_roles")
                .with_list_parse_key("site.locales"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
