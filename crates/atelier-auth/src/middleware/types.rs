//! Authentication context types.

use crate::token::AccessClaims;

/// Identity resolved from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Subject of the token.
    pub id: String,
    /// Username for display/logging.
    pub username: String,
    /// Roles granted by the token.
    pub roles: Vec<String>,
}

impl UserContext {
    /// Returns `true` if the user has a specific role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Returns `true` if the user has any of the specified roles.
    #[must_use]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

impl From<AccessClaims> for UserContext {
    fn from(claims: AccessClaims) -> Self {
        let username = if claims.username.is_empty() {
            claims.sub.clone()
        } else {
            claims.username
        };
        Self {
            id: claims.sub,
            username,
            roles: claims.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_context_roles() {
        let user = UserContext {
            id: "u1".into(),
            username: "mira".into(),
            roles: vec!["admin".into(), "editor".into()],
        };
        assert!(user.has_role("editor"));
        assert!(!user.has_role("owner"));
        assert!(user.has_any_role(&["owner", "admin"]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn test_username_falls_back_to_subject() {
        let user = UserContext::from(AccessClaims {
            sub: "u42".into(),
            username: String::new(),
            roles: vec![],
            iss: "atelier".into(),
            iat: 0,
            exp: 1,
        });
        assert_eq!(user.username, "u42");
    }
}
