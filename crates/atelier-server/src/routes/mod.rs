//! HTTP routes.
//!
//! ```text
//! GET    /api/site/{locale}                              public home page
//! GET    /api/site/{locale}/{page}                       about | gallery | news | store
//! GET    /api/admin/sections                             per-section summary
//! GET    /api/admin/sections/{section_type}              items (incl. inactive) + settings
//! PUT    /api/admin/sections/{section_type}              save items + settings
//! PATCH  /api/admin/sections/{section_type}/items/{id}   update one item
//! DELETE /api/admin/sections/{section_type}/items/{id}   delete one item
//! ```

pub mod admin;
pub mod site;

use atelier_api::{ApiError, FieldIssue};
use atelier_core::SectionType;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, patch};

use crate::server::AppState;

pub fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/api/site/{locale}", get(site::home))
        .route("/api/site/{locale}/{page}", get(site::page))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/sections", get(admin::list_sections))
        .route(
            "/api/admin/sections/{section_type}",
            get(admin::get_section).put(admin::save_section),
        )
        .route(
            "/api/admin/sections/{section_type}/items/{id}",
            patch(admin::update_item).delete(admin::delete_item),
        )
}

pub(crate) fn parse_section_type(raw: &str) -> Result<SectionType, ApiError> {
    raw.parse::<SectionType>()
        .map_err(|_| ApiError::not_found(format!("Unknown section '{raw}'")))
}

/// Turns a body that did not deserialize into a validation failure.
pub(crate) fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::validation(
        "Request body is invalid",
        vec![FieldIssue::new("body", rejection.body_text())],
    )
}
