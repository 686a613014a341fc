use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use atelier_auth::JwtService;
use serde::{Deserialize, Serialize};

use crate::cli::MintArgs;

/// Bearer token saved for a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCredentials {
    pub server: Option<String>,
    pub access_token: String,
}

impl StoredCredentials {
    /// Short form of the token for display.
    pub fn preview(&self) -> String {
        let token = &self.access_token;
        if token.len() > 20 {
            format!("{}...{}", &token[..8], &token[token.len() - 8..])
        } else {
            token.clone()
        }
    }
}

fn creds_path(profile: &str) -> Result<PathBuf> {
    Ok(crate::config::config_dir()?.join(format!("credentials.{profile}.json")))
}

pub fn load_credentials(profile: &str) -> Result<Option<StoredCredentials>> {
    let path = creds_path(profile)?;
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let creds: StoredCredentials = serde_json::from_str(&content)?;
    Ok(Some(creds))
}

pub fn save_credentials(profile: &str, creds: &StoredCredentials) -> Result<()> {
    let path = creds_path(profile)?;
    let content = serde_json::to_string_pretty(creds)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn remove_credentials(profile: &str) -> Result<bool> {
    let path = creds_path(profile)?;
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Signs a token the server will accept, given its secret and issuer.
pub fn mint(args: &MintArgs) -> Result<String> {
    if args.ttl == 0 {
        anyhow::bail!("--ttl must be positive");
    }
    let jwt = JwtService::new(args.secret.as_bytes(), args.issuer.clone());
    let username = args.username.as_deref().unwrap_or(&args.subject);
    Ok(jwt.issue(&args.subject, username, args.roles.clone(), args.ttl)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MintArgs {
        MintArgs {
            secret: "0123456789abcdef0123456789abcdef".into(),
            issuer: "atelier".into(),
            subject: "ops".into(),
            username: None,
            roles: vec!["admin".into()],
            ttl: 600,
            save: false,
        }
    }

    #[test]
    fn minted_token_decodes_with_same_secret() {
        let token = mint(&args()).unwrap();
        let claims = JwtService::new(b"0123456789abcdef0123456789abcdef", "atelier")
            .decode(&token)
            .unwrap();
        assert_eq!(claims.sub, "ops");
        assert_eq!(claims.username, "ops");
        assert_eq!(claims.roles, vec!["admin"]);
    }

    #[test]
    fn non_positive_ttl_rejected() {
        let mut bad = args();
        bad.ttl = 0;
        assert!(mint(&bad).is_err());
    }

    #[test]
    fn preview_shortens_long_tokens() {
        let creds = StoredCredentials {
            server: None,
            access_token: "a".repeat(8) + &"x".repeat(30) + &"z".repeat(8),
        };
        assert_eq!(creds.preview(), "aaaaaaaa...zzzzzzzz");
    }
}
