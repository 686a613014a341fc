//! Admin authentication extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AuthError;

use super::auth::{AuthState, BearerAuth};
use super::types::UserContext;

/// Requires a valid bearer token whose identity passes the
/// [`AuthorizationPolicy`](crate::AuthorizationPolicy).
///
/// Missing or invalid tokens reject with 401, identities without an admin
/// role with 403.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub UserContext);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerAuth(user) = BearerAuth::from_request_parts(parts, state).await?;
        let auth_state = AuthState::from_ref(state);
        auth_state.policy.require_admin(Some(&user))?;

        tracing::debug!(user_id = %user.id, username = %user.username, "Admin access granted");
        Ok(Self(user))
    }
}
