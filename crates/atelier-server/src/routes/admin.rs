use atelier_api::{ActionResponse, ApiError};
use atelier_auth::{AdminAuth, OptionalBearerAuth};
use atelier_core::{SectionType, validate_id};
use atelier_storage::{SectionItem, SectionSettings, SettingsFields};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::{body_error, parse_section_type};
use crate::pages::Page;
use crate::reconcile::{ItemPatch, SectionSubmission};
use crate::sections::{all_bindings, binding_for};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub section_type: SectionType,
    pub label: &'static str,
    pub max_items: usize,
    pub pages: &'static [Page],
    pub item_count: usize,
    pub active_count: usize,
    pub settings: Option<SettingsFields>,
}

#[derive(Debug, Serialize)]
pub struct SectionDetail {
    pub section_type: SectionType,
    pub label: &'static str,
    pub max_items: usize,
    pub settings: Option<SectionSettings>,
    pub items: Vec<SectionItem>,
}

fn storage_failure(section_type: SectionType, e: atelier_storage::StorageError) -> ApiError {
    tracing::error!(section = %section_type, error = %e, "section read failed");
    ApiError::internal("Section data is temporarily unavailable")
}

pub async fn list_sections(
    State(state): State<AppState>,
    AdminAuth(_user): AdminAuth,
) -> Result<Json<Vec<SectionSummary>>, ApiError> {
    let mut summaries = Vec::new();
    for binding in all_bindings() {
        let section_type = binding.section_type;
        let items = state
            .store
            .list_items(section_type)
            .await
            .map_err(|e| storage_failure(section_type, e))?;
        let settings = state
            .store
            .get_settings(section_type)
            .await
            .map_err(|e| storage_failure(section_type, e))?;
        summaries.push(SectionSummary {
            section_type,
            label: binding.label,
            max_items: binding.max_items,
            pages: binding.pages,
            item_count: items.len(),
            active_count: items.iter().filter(|i| i.is_active).count(),
            settings: settings.map(|s| s.fields),
        });
    }
    Ok(Json(summaries))
}

pub async fn get_section(
    State(state): State<AppState>,
    AdminAuth(_user): AdminAuth,
    Path(section): Path<String>,
) -> Result<Json<SectionDetail>, ApiError> {
    let section_type = parse_section_type(&section)?;
    let binding = binding_for(section_type);
    let items = state
        .store
        .list_items(section_type)
        .await
        .map_err(|e| storage_failure(section_type, e))?;
    let settings = state
        .store
        .get_settings(section_type)
        .await
        .map_err(|e| storage_failure(section_type, e))?;
    Ok(Json(SectionDetail {
        section_type,
        label: binding.label,
        max_items: binding.max_items,
        settings,
        items,
    }))
}

/// Saves a section. The admin check comes before any other failure so an
/// unauthorized caller learns nothing about the section or the body.
pub async fn save_section(
    State(state): State<AppState>,
    OptionalBearerAuth(user): OptionalBearerAuth,
    Path(section): Path<String>,
    body: Result<Json<SectionSubmission>, JsonRejection>,
) -> Result<ActionResponse, ApiError> {
    state.reconciler.policy().require_admin(user.as_ref())?;
    let section_type = parse_section_type(&section)?;
    let Json(submission) = body.map_err(body_error)?;

    let outcome = state
        .reconciler
        .reconcile_section(section_type, &submission, user.as_ref())
        .await?;
    Ok(ActionResponse::ok(format!(
        "{} saved ({} items)",
        binding_for(section_type).label,
        outcome.saved_count
    )))
}

pub async fn update_item(
    State(state): State<AppState>,
    OptionalBearerAuth(user): OptionalBearerAuth,
    Path((section, id)): Path<(String, String)>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.reconciler.policy().require_admin(user.as_ref())?;
    let section_type = parse_section_type(&section)?;
    let id = parse_item_id(section_type, &id)?;
    let Json(patch) = body.map_err(body_error)?;

    let item = state
        .reconciler
        .update_item(section_type, id, &patch, user.as_ref())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Item updated",
        "item": item,
    })))
}

pub async fn delete_item(
    State(state): State<AppState>,
    OptionalBearerAuth(user): OptionalBearerAuth,
    Path((section, id)): Path<(String, String)>,
) -> Result<ActionResponse, ApiError> {
    state.reconciler.policy().require_admin(user.as_ref())?;
    let section_type = parse_section_type(&section)?;
    let id = parse_item_id(section_type, &id)?;

    state
        .reconciler
        .delete_item(section_type, id, user.as_ref())
        .await?;
    Ok(ActionResponse::ok("Item deleted"))
}

// Placeholder and malformed ids can never name a stored item.
fn parse_item_id(section_type: SectionType, raw: &str) -> Result<Uuid, ApiError> {
    validate_id(raw).map_err(|_| ApiError::not_found(format!("{section_type} item {raw} not found")))
}
