use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

pub(crate) fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".atelier");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all() -> Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    Ok(load_all()?.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all()?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path()?, content)?;
    Ok(())
}

/// Checks that a server value is an absolute http(s) URL and drops any
/// trailing slash.
pub fn normalize_server(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw).with_context(|| format!("Invalid server URL: {raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Server URL must use http or https: {raw}");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

pub fn resolve_server(cli_server: &Option<String>, profile: &str) -> Result<String> {
    // 1. --server flag / ATELIER_URL env
    if let Some(s) = cli_server {
        return normalize_server(s);
    }
    // 2. config.toml profile
    if let Some(s) = load_profile(profile)?.server {
        return normalize_server(&s);
    }
    // 3. Stored credentials for this profile
    if let Ok(Some(creds)) = crate::auth::load_credentials(profile)
        && let Some(server) = creds.server
    {
        return normalize_server(&server);
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set ATELIER_URL, or run: atelier config set server <url>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profiles() {
        let all = parse(
            r#"
[default]
server = "http://localhost:8080"

[prod]
server = "https://content.example.com"
format = "table"
"#,
        )
        .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["prod"].format.as_deref(), Some("table"));
        assert!(all["default"].format.is_none());
    }

    #[test]
    fn server_urls() {
        assert_eq!(
            normalize_server("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
        assert!(normalize_server("localhost:8080").is_err());
        assert!(normalize_server("ftp://example.com").is_err());
    }
}
