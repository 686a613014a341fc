//! Axum extractors for authentication and authorization.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use atelier_auth::middleware::{AdminAuth, AuthState};
//!
//! async fn admin_handler(AdminAuth(user): AdminAuth) -> String {
//!     format!("Hello, {}!", user.username)
//! }
//!
//! let app = Router::new()
//!     .route("/admin", get(admin_handler))
//!     .with_state(auth_state);
//! ```

pub mod admin;
pub mod auth;
pub mod error;
pub mod types;

pub use admin::AdminAuth;
pub use auth::{AuthState, BearerAuth, OptionalBearerAuth};
pub use types::UserContext;
