//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication settings, loaded from the `[auth]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 secret. Must be at least 32 bytes.
    pub jwt_secret: String,
    /// Expected `iss` claim; tokens from other issuers are rejected.
    pub issuer: String,
    /// Roles that grant the admin capability.
    pub admin_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "atelier".to_string(),
            admin_roles: vec!["admin".to_string()],
        }
    }
}

impl AuthConfig {
    /// Minimum length of the shared secret.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Validates the configuration, returning a readable message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "auth.jwt_secret must be at least {} bytes",
                Self::MIN_SECRET_LEN
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err("auth.issuer must not be empty".into());
        }
        if self.admin_roles.iter().all(|r| r.trim().is_empty()) {
            return Err("auth.admin_roles must name at least one role".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            jwt_secret: "x".repeat(32),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = AuthConfig {
            jwt_secret: "short".into(),
            ..valid()
        };
        assert!(config.validate().unwrap_err().contains("jwt_secret"));
    }

    #[test]
    fn test_empty_roles_rejected() {
        let config = AuthConfig {
            admin_roles: vec![],
            ..valid()
        };
        assert!(config.validate().unwrap_err().contains("admin_roles"));
    }
}
