//! Authentication and authorization for the Atelier admin surface.
//!
//! Identity comes from an `Authorization: Bearer <JWT>` header signed with a
//! shared HS256 secret. Whether an identity may edit content is decided by a
//! single [`AuthorizationPolicy`] built once from configuration.

pub mod config;
pub mod error;
pub mod middleware;
pub mod policy;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use middleware::{AdminAuth, AuthState, BearerAuth, OptionalBearerAuth, UserContext};
pub use policy::AuthorizationPolicy;
pub use token::{AccessClaims, JwtError, JwtService};
