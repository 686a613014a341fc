//! JWT issuing and validation.
//!
//! Tokens are signed with HS256 using a shared secret. Validation checks the
//! signature, the `exp` claim and the configured issuer.
//!
//! ```ignore
//! let jwt = JwtService::new(secret.as_bytes(), "atelier");
//! let token = jwt.issue("user-1", "mira", vec!["admin".into()], 3600)?;
//! let claims = jwt.decode(&token)?;
//! ```

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(err.to_string()),
        }
    }
}

/// Claims carried by an admin access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id).
    pub sub: String,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Roles granted to the subject.
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Encodes and validates HS256 tokens for one issuer.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Encodes arbitrary claims.
    pub fn encode(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Mints a token for `subject` valid for `ttl_secs` from now.
    pub fn issue(
        &self,
        subject: impl Into<String>,
        username: impl Into<String>,
        roles: Vec<String>,
        ttl_secs: u64,
    ) -> Result<String, JwtError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX - now);
        self.encode(&AccessClaims {
            sub: subject.into(),
            username: username.into(),
            roles,
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(ttl),
        })
    }

    /// Decodes and validates a token.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_aud = false;

        Ok(decode::<AccessClaims>(token, &self.decoding_key, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_and_decode() {
        let jwt = JwtService::new(SECRET, "atelier");
        let token = jwt
            .issue("user-1", "mira", vec!["admin".into()], 600)
            .unwrap();

        let claims = jwt.decode(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "mira");
        assert_eq!(claims.roles, vec!["admin".to_string()]);
        assert_eq!(claims.iss, "atelier");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new(SECRET, "atelier");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = jwt
            .encode(&AccessClaims {
                sub: "user-1".into(),
                username: String::new(),
                roles: vec![],
                iss: "atelier".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert!(matches!(jwt.decode(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let minted = JwtService::new(SECRET, "someone-else")
            .issue("user-1", "", vec![], 600)
            .unwrap();
        let jwt = JwtService::new(SECRET, "atelier");
        assert!(matches!(jwt.decode(&minted), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let minted = JwtService::new(b"another-secret-another-secret-xx", "atelier")
            .issue("user-1", "", vec![], 600)
            .unwrap();
        let jwt = JwtService::new(SECRET, "atelier");
        assert!(matches!(jwt.decode(&minted), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let jwt = JwtService::new(SECRET, "atelier");
        assert!(jwt.decode("not-a-jwt").is_err());
    }
}
