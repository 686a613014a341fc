use std::sync::Arc;

use atelier_api::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::pages::{Page, compose_page};
use crate::server::AppState;

pub const CACHE_STATUS_HEADER: &str = "x-cache";

pub async fn home(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Result<Response, ApiError> {
    render(&state, &locale, Page::Home).await
}

pub async fn page(
    State(state): State<AppState>,
    Path((locale, page)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    // Home is only served at /api/site/{locale}.
    let page = page
        .parse::<Page>()
        .ok()
        .filter(|p| *p != Page::Home)
        .ok_or_else(|| ApiError::not_found(format!("Unknown page '{page}'")))?;
    render(&state, &locale, page).await
}

async fn render(state: &AppState, locale: &str, page: Page) -> Result<Response, ApiError> {
    if !state.site.supports(locale) {
        return Err(ApiError::not_found(format!("Unknown locale '{locale}'")));
    }

    let key = page.render_path(locale);
    if let Some(cache) = &state.render_cache
        && let Some(body) = cache.get(&key)
    {
        return Ok(cached_response(&body, "HIT"));
    }

    // Read before composing so a save landing mid-render keeps its body out.
    let generation = state.render_cache.as_ref().map(|c| c.generation());
    let view = compose_page(state.store.as_ref(), page, locale)
        .await
        .map_err(|e| {
            tracing::error!(page = %page, locale, error = %e, "page composition failed");
            ApiError::internal("Page is temporarily unavailable")
        })?;
    let body = serde_json::to_value(&view).map_err(|e| {
        tracing::error!(page = %page, error = %e, "page serialization failed");
        ApiError::internal("Page is temporarily unavailable")
    })?;
    let body = Arc::new(body);

    if let Some(cache) = &state.render_cache
        && let Some(generation) = generation
        && !cache.insert(key, Arc::clone(&body), generation)
    {
        tracing::debug!(page = %page, locale, "page changed while rendering; not cached");
    }
    Ok(cached_response(&body, "MISS"))
}

fn cached_response(body: &Value, status: &'static str) -> Response {
    (
        [(
            HeaderName::from_static(CACHE_STATUS_HEADER),
            HeaderValue::from_static(status),
        )],
        Json(body),
    )
        .into_response()
}
