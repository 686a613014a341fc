use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage: Option<&'a str>,
}

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "service": "Atelier Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.store.backend_name(),
        "render_cache": state.render_cache.as_ref().map(|c| c.stats()),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            storage: None,
        }),
    )
}

/// Ready once the store answers a read.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.store.backend_name();
    match state.store.list_settings().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                storage: Some(backend),
            }),
        ),
        Err(e) => {
            tracing::warn!(backend, error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    storage: Some(backend),
                }),
            )
        }
    }
}
