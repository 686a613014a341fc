//! The admin capability check.

use crate::error::AuthError;
use crate::middleware::UserContext;

/// Decides whether an identity may mutate site content.
///
/// Built once from configuration and shared by every admin entry point.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    admin_roles: Vec<String>,
}

impl AuthorizationPolicy {
    pub fn new(admin_roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            admin_roles: admin_roles
                .into_iter()
                .map(Into::into)
                .filter(|r: &String| !r.trim().is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn admin_roles(&self) -> &[String] {
        &self.admin_roles
    }

    /// Returns `true` if the user holds any admin role.
    #[must_use]
    pub fn is_admin(&self, user: &UserContext) -> bool {
        self.admin_roles.iter().any(|role| user.has_role(role))
    }

    /// Fails closed: no identity is `Unauthorized`, an identity without an
    /// admin role is `Forbidden`.
    pub fn require_admin<'a>(
        &self,
        user: Option<&'a UserContext>,
    ) -> Result<&'a UserContext, AuthError> {
        let user = user.ok_or_else(|| AuthError::unauthorized("Authentication required"))?;
        if self.is_admin(user) {
            Ok(user)
        } else {
            tracing::debug!(
                user_id = %user.id,
                roles = ?user.roles,
                "Admin access denied: missing admin role"
            );
            Err(AuthError::forbidden("Admin access required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> UserContext {
        UserContext {
            id: "u1".into(),
            username: "mira".into(),
            roles: roles.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_admin_role_grants_access() {
        let policy = AuthorizationPolicy::new(["admin", "owner"]);
        assert!(policy.is_admin(&user(&["owner"])));
        assert!(policy.require_admin(Some(&user(&["admin", "editor"]))).is_ok());
    }

    #[test]
    fn test_missing_identity_is_unauthorized() {
        let policy = AuthorizationPolicy::new(["admin"]);
        assert!(matches!(
            policy.require_admin(None),
            Err(AuthError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let policy = AuthorizationPolicy::new(["admin"]);
        let err = policy.require_admin(Some(&user(&["editor"]))).unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_blank_roles_never_match() {
        let policy = AuthorizationPolicy::new([" ", ""]);
        assert!(policy.admin_roles().is_empty());
        assert!(!policy.is_admin(&user(&[""])));
    }
}
