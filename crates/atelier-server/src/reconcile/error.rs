use std::fmt;

use atelier_api::{ApiError, FieldIssue};
use atelier_auth::AuthError;
use atelier_core::SectionType;
use atelier_storage::StorageError;
use uuid::Uuid;

/// Storage step at which a reconcile failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    Begin,
    FetchExisting,
    Update,
    Insert,
    Delete,
    SettingsUpsert,
    Commit,
}

impl ReconcileStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReconcileStep::Begin => "begin",
            ReconcileStep::FetchExisting => "fetch-existing",
            ReconcileStep::Update => "update",
            ReconcileStep::Insert => "insert",
            ReconcileStep::Delete => "delete",
            ReconcileStep::SettingsUpsert => "settings-upsert",
            ReconcileStep::Commit => "commit",
        }
    }
}

impl fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    #[error("persistence failed at step '{step}': {source}")]
    Persistence {
        step: ReconcileStep,
        #[source]
        source: StorageError,
    },

    #[error("{section_type} item {id} not found")]
    NotFound { section_type: SectionType, id: Uuid },
}

impl ReconcileError {
    pub(crate) fn at(step: ReconcileStep) -> impl FnOnce(StorageError) -> Self {
        move |source| ReconcileError::Persistence { step, source }
    }

    pub fn step(&self) -> Option<ReconcileStep> {
        match self {
            ReconcileError::Persistence { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Unauthorized(auth) => ApiError::from(auth),
            ReconcileError::Validation(issues) => {
                ApiError::validation("Submitted content is invalid", issues)
            }
            // Storage details are logged where they happen, never returned.
            // A failed commit may still have been applied by the database.
            ReconcileError::Persistence {
                step: ReconcileStep::Commit,
                ..
            } => ApiError::internal(
                "The save could not be confirmed. Reload the section to check it, then re-save if needed.",
            ),
            ReconcileError::Persistence { .. } => ApiError::internal(
                "Changes could not be saved and nothing was modified. Please re-save.",
            ),
            err @ ReconcileError::NotFound { .. } => ApiError::not_found(err.to_string()),
        }
    }
}
