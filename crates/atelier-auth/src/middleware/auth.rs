//! Bearer token authentication extractors.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::policy::AuthorizationPolicy;
use crate::token::JwtService;

use super::types::UserContext;

// =============================================================================
// Auth State
// =============================================================================

/// State required by the auth extractors, made available via `FromRef`.
///
/// ```ignore
/// impl FromRef<AppState> for AuthState {
///     fn from_ref(state: &AppState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthState {
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// The admin capability check.
    pub policy: Arc<AuthorizationPolicy>,
}

impl AuthState {
    pub fn new(jwt_service: Arc<JwtService>, policy: Arc<AuthorizationPolicy>) -> Self {
        Self {
            jwt_service,
            policy,
        }
    }

    /// Validates a raw bearer token and resolves the identity it carries.
    pub fn authenticate(&self, token: &str) -> Result<UserContext, AuthError> {
        let claims = self.jwt_service.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode token");
            AuthError::from(e)
        })?;
        Ok(UserContext::from(claims))
    }
}

/// Reads the token from `Authorization: Bearer <token>`.
///
/// `Ok(None)` when the header is absent; an error when it is present but
/// not a usable bearer credential.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AuthError::unauthorized("Malformed Authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| AuthError::unauthorized("Authorization scheme must be Bearer"))?;
    if token.is_empty() {
        return Err(AuthError::unauthorized("Empty Bearer token"));
    }
    Ok(Some(token))
}

// =============================================================================
// Extractors
// =============================================================================

/// Requires a valid bearer token and yields the caller's identity.
///
/// Rejects with 401 when the header is missing or the token is invalid or
/// expired.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub UserContext);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let token = bearer_token(parts)?
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;
        auth_state.authenticate(token).map(Self)
    }
}

/// Like [`BearerAuth`] but yields `None` when no header is sent.
///
/// A header that is present but invalid still rejects.
#[derive(Debug, Clone)]
pub struct OptionalBearerAuth(pub Option<UserContext>);

impl<S> FromRequestParts<S> for OptionalBearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        match bearer_token(parts)? {
            Some(token) => auth_state.authenticate(token).map(|u| Self(Some(u))),
            None => Ok(Self(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn state() -> AuthState {
        AuthState::new(
            Arc::new(JwtService::new(SECRET, "atelier")),
            Arc::new(AuthorizationPolicy::new(["admin"])),
        )
    }

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/admin/sections/store");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_bearer_auth_accepts_valid_token() {
        let state = state();
        let token = state
            .jwt_service
            .issue("u1", "mira", vec!["admin".into()], 60)
            .unwrap();
        let mut parts = parts(Some(&format!("Bearer {token}")));

        let BearerAuth(user) = BearerAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.has_role("admin"));
    }

    #[tokio::test]
    async fn test_bearer_auth_missing_header() {
        let mut parts = parts(None);
        let err = BearerAuth::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_bearer_auth_wrong_scheme() {
        let mut parts = parts(Some("Basic dXNlcjpwYXNz"));
        let err = BearerAuth::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_bearer_auth_invalid_token() {
        let mut parts = parts(Some("Bearer nope"));
        let err = BearerAuth::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_optional_bearer_auth_without_header() {
        let mut parts = parts(None);
        let OptionalBearerAuth(user) = OptionalBearerAuth::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
