//! Authentication and authorization error types.

use crate::token::JwtError;

/// Errors that can occur while authenticating or authorizing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable credentials were presented.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The caller is authenticated but lacks the required capability.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The bearer token is malformed, badly signed or from another issuer.
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// The bearer token has expired.
    #[error("Token expired")]
    TokenExpired,
}

impl AuthError {
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Returns `true` when the caller has an identity but not the capability.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            other => AuthError::invalid_token(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_error_conversion() {
        assert!(matches!(AuthError::from(JwtError::Expired), AuthError::TokenExpired));
        assert!(matches!(
            AuthError::from(JwtError::Invalid("bad signature".into())),
            AuthError::InvalidToken { .. }
        ));
    }

    #[test]
    fn test_is_forbidden() {
        assert!(AuthError::forbidden("nope").is_forbidden());
        assert!(!AuthError::unauthorized("who?").is_forbidden());
    }
}
