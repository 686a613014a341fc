use std::collections::HashSet;
use std::sync::Arc;

use atelier_auth::{AuthorizationPolicy, UserContext};
use atelier_core::{SectionType, now_utc};
use atelier_storage::{DynSectionStore, SectionItem, SectionTransaction};
use serde::Serialize;
use uuid::Uuid;

use super::error::{ReconcileError, ReconcileStep};
use super::plan::plan;
use super::submission::{ItemPatch, SectionSubmission};
use crate::cache::InvalidationHook;
use crate::sections::{Binding, SectionBinding, binding_for};

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Number of submitted items, all of which are now stored.
    pub saved_count: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: u64,
}

/// Applies admin edits to sections.
///
/// Every entry point checks the admin capability first and validates input
/// against the section's binding before any storage call. Multi-row changes
/// run in one store transaction. After a commit the section's rendered paths
/// are handed to the invalidation hook.
#[derive(Clone)]
pub struct SectionReconciler {
    store: DynSectionStore,
    policy: Arc<AuthorizationPolicy>,
    hook: Arc<dyn InvalidationHook>,
}

impl SectionReconciler {
    pub fn new(
        store: DynSectionStore,
        policy: Arc<AuthorizationPolicy>,
        hook: Arc<dyn InvalidationHook>,
    ) -> Self {
        Self {
            store,
            policy,
            hook,
        }
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Saves the full item list and settings of the section bound by `B`.
    pub async fn reconcile<B: SectionBinding>(
        &self,
        submission: &SectionSubmission,
        actor: Option<&UserContext>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        self.reconcile_section(B::SECTION_TYPE, submission, actor)
            .await
    }

    /// Saves the full item list and settings of a section.
    pub async fn reconcile_section(
        &self,
        section_type: SectionType,
        submission: &SectionSubmission,
        actor: Option<&UserContext>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let user = self.policy.require_admin(actor)?;
        let binding = binding_for(section_type);
        binding
            .validate_submission(submission)
            .map_err(ReconcileError::Validation)?;

        let mut tx = self
            .store
            .begin_transaction()
            .await
            .map_err(ReconcileError::at(ReconcileStep::Begin))
            .inspect_err(|e| log_failure(section_type, e))?;

        let outcome = match apply_submission(tx.as_mut(), section_type, submission).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log_failure(section_type, &err);
                rollback(tx, section_type).await;
                return Err(err);
            }
        };
        tx.commit()
            .await
            .map_err(ReconcileError::at(ReconcileStep::Commit))
            .inspect_err(|e| log_failure(section_type, e))?;

        tracing::info!(
            section = %section_type,
            user_id = %user.id,
            saved = outcome.saved_count,
            created = outcome.created,
            updated = outcome.updated,
            deleted = outcome.deleted,
            "section saved"
        );
        self.invalidate(binding).await;
        Ok(outcome)
    }

    /// Changes the payload and/or visibility of one stored item.
    pub async fn update_item(
        &self,
        section_type: SectionType,
        id: Uuid,
        patch: &ItemPatch,
        actor: Option<&UserContext>,
    ) -> Result<SectionItem, ReconcileError> {
        let user = self.policy.require_admin(actor)?;
        let binding = binding_for(section_type);
        if let Some(data) = &patch.data {
            let mut issues = Vec::new();
            binding.validate_data(data, "data", &mut issues);
            if !issues.is_empty() {
                return Err(ReconcileError::Validation(issues));
            }
        }

        let current = self
            .store
            .get_item(section_type, id)
            .await
            .map_err(ReconcileError::at(ReconcileStep::FetchExisting))
            .inspect_err(|e| log_failure(section_type, e))?
            .ok_or(ReconcileError::NotFound { section_type, id })?;

        let changed = SectionItem {
            data: patch.data.clone().unwrap_or(current.data),
            is_active: patch.is_active.unwrap_or(current.is_active),
            updated_at: now_utc(),
            ..current
        };
        let saved = self
            .store
            .upsert_item(&changed)
            .await
            .map_err(ReconcileError::at(ReconcileStep::Update))
            .inspect_err(|e| log_failure(section_type, e))?;

        tracing::info!(section = %section_type, item_id = %id, user_id = %user.id, "section item updated");
        self.invalidate(binding).await;
        Ok(saved)
    }

    /// Deletes one stored item and closes the gap in `order`.
    pub async fn delete_item(
        &self,
        section_type: SectionType,
        id: Uuid,
        actor: Option<&UserContext>,
    ) -> Result<(), ReconcileError> {
        let user = self.policy.require_admin(actor)?;
        let binding = binding_for(section_type);

        let mut tx = self
            .store
            .begin_transaction()
            .await
            .map_err(ReconcileError::at(ReconcileStep::Begin))
            .inspect_err(|e| log_failure(section_type, e))?;

        if let Err(err) = remove_and_renumber(tx.as_mut(), section_type, id).await {
            if !matches!(err, ReconcileError::NotFound { .. }) {
                log_failure(section_type, &err);
            }
            rollback(tx, section_type).await;
            return Err(err);
        }
        tx.commit()
            .await
            .map_err(ReconcileError::at(ReconcileStep::Commit))
            .inspect_err(|e| log_failure(section_type, e))?;

        tracing::info!(section = %section_type, item_id = %id, user_id = %user.id, "section item deleted");
        self.invalidate(binding).await;
        Ok(())
    }

    async fn invalidate(&self, binding: &Binding) {
        let paths = binding.invalidation_paths();
        if let Err(e) = self.hook.invalidate(&paths).await {
            tracing::warn!(
                section = %binding.section_type,
                error = %e,
                "cache invalidation failed; stale pages will expire on their own"
            );
        }
    }
}

async fn apply_submission(
    tx: &mut dyn SectionTransaction,
    section_type: SectionType,
    submission: &SectionSubmission,
) -> Result<ReconcileOutcome, ReconcileError> {
    let existing = tx
        .list_items(section_type)
        .await
        .map_err(ReconcileError::at(ReconcileStep::FetchExisting))?;
    let planned = plan(&existing, &submission.items, submission.delete_missing);
    let now = now_utc();

    for update in &planned.updates {
        let Some(current) = existing.iter().find(|item| item.id == update.id) else {
            continue;
        };
        let item = SectionItem {
            data: update.data.clone(),
            order: update.order,
            is_active: update.is_active,
            updated_at: now,
            ..current.clone()
        };
        tx.upsert_item(&item)
            .await
            .map_err(ReconcileError::at(ReconcileStep::Update))?;
    }

    for (id, order) in &planned.retained {
        let Some(current) = existing.iter().find(|item| item.id == *id) else {
            continue;
        };
        let item = SectionItem {
            order: *order,
            ..current.clone()
        };
        tx.upsert_item(&item)
            .await
            .map_err(ReconcileError::at(ReconcileStep::Update))?;
    }

    for insert in &planned.inserts {
        let item = SectionItem::new(
            section_type,
            insert.data.clone(),
            insert.order,
            insert.is_active,
            now,
        );
        tx.upsert_item(&item)
            .await
            .map_err(ReconcileError::at(ReconcileStep::Insert))?;
    }

    let deleted = if planned.deletes.is_empty() {
        0
    } else {
        tx.delete_items(section_type, &planned.deletes)
            .await
            .map_err(ReconcileError::at(ReconcileStep::Delete))?
    };

    tx.upsert_settings(section_type, &submission.settings)
        .await
        .map_err(ReconcileError::at(ReconcileStep::SettingsUpsert))?;

    Ok(ReconcileOutcome {
        saved_count: submission.items.len(),
        created: planned.inserts.len(),
        updated: planned.updates.len(),
        deleted,
    })
}

async fn remove_and_renumber(
    tx: &mut dyn SectionTransaction,
    section_type: SectionType,
    id: Uuid,
) -> Result<(), ReconcileError> {
    let existing = tx
        .list_items(section_type)
        .await
        .map_err(ReconcileError::at(ReconcileStep::FetchExisting))?;
    if !existing.iter().any(|item| item.id == id) {
        return Err(ReconcileError::NotFound { section_type, id });
    }

    tx.delete_items(section_type, &HashSet::from([id]))
        .await
        .map_err(ReconcileError::at(ReconcileStep::Delete))?;

    for (order, item) in existing.into_iter().filter(|item| item.id != id).enumerate() {
        let order = order as u32;
        if item.order != order {
            tx.upsert_item(&SectionItem { order, ..item })
                .await
                .map_err(ReconcileError::at(ReconcileStep::Update))?;
        }
    }
    Ok(())
}

async fn rollback(tx: Box<dyn SectionTransaction>, section_type: SectionType) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(section = %section_type, error = %e, "transaction rollback failed");
    }
}

fn log_failure(section_type: SectionType, err: &ReconcileError) {
    if let ReconcileError::Persistence { step, source } = err {
        tracing::error!(
            section = %section_type,
            step = %step,
            error = %source,
            "section write failed"
        );
    }
}
