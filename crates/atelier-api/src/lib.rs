use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// -------------------------
// Envelope
// -------------------------

/// Machine-readable error class carried in every failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Server,
}

/// One failed field check: a dotted/indexed path and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

/// `{ "success": false, "error": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

/// `{ "success": true, "message": "..." }` returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// -------------------------
// API errors
// -------------------------

/// High-level API errors mapped to HTTP status codes and the failure envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        issues: Vec<FieldIssue>,
    },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self::Validation {
            message: msg.into(),
            issues,
        }
    }
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => ErrorKind::Validation,
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => ErrorKind::Unauthorized,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Internal(_) => ErrorKind::Server,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        let (message, issues) = match self {
            ApiError::Validation { message, issues } => (message.clone(), issues.clone()),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => (msg.clone(), Vec::new()),
        };
        ErrorEnvelope {
            success: false,
            error: ErrorBody {
                kind: self.kind(),
                message,
                issues,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.to_envelope())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variants_map_to_status_and_kind() {
        let cases: Vec<(ApiError, StatusCode, ErrorKind)> = vec![
            (
                ApiError::validation("x", vec![]),
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Validation,
            ),
            (ApiError::bad_request("x"), StatusCode::BAD_REQUEST, ErrorKind::Validation),
            (ApiError::unauthorized("x"), StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized),
            (ApiError::forbidden("x"), StatusCode::FORBIDDEN, ErrorKind::Unauthorized),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND, ErrorKind::NotFound),
            (ApiError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Server),
        ];
        for (err, status, kind) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn envelope_shape() {
        let err = ApiError::validation(
            "2 problems",
            vec![
                FieldIssue::new("items[0].data.title", "is required"),
                FieldIssue::new("settings.max_items", "must be between 1 and 24"),
            ],
        );
        let value = serde_json::to_value(err.to_envelope()).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": {
                    "kind": "validation",
                    "message": "2 problems",
                    "issues": [
                        { "path": "items[0].data.title", "message": "is required" },
                        { "path": "settings.max_items", "message": "must be between 1 and 24" }
                    ]
                }
            })
        );
    }

    #[test]
    fn envelope_omits_empty_issues() {
        let value = serde_json::to_value(ApiError::not_found("gone").to_envelope()).unwrap();
        assert_eq!(value["error"]["kind"], "not_found");
        assert!(value["error"].get("issues").is_none());
    }

    #[test]
    fn unauthorized_response_carries_challenge() {
        let resp = ApiError::unauthorized("Missing token").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[test]
    fn action_response_serializes() {
        let value = serde_json::to_value(ActionResponse::ok("Saved 3 items")).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "Saved 3 items" }));
    }
}
