//! Error responses for the auth extractors.

use atelier_api::ApiError;
use axum::response::{IntoResponse, Response};

use crate::error::AuthError;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden { message } => ApiError::forbidden(message),
            AuthError::Unauthorized { message } | AuthError::InvalidToken { message } => {
                ApiError::unauthorized(message)
            }
            AuthError::TokenExpired => ApiError::unauthorized("Token has expired"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
