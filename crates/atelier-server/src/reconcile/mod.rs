//! Section reconciliation: diff a submitted, ordered item list against what is
//! stored and apply the inserts, updates and deletes plus a settings upsert in
//! one transaction.

mod error;
mod plan;
mod reconciler;
mod submission;

pub use error::{ReconcileError, ReconcileStep};
pub use plan::{PlannedInsert, PlannedUpdate, ReconcilePlan, plan};
pub use reconciler::{ReconcileOutcome, SectionReconciler};
pub use submission::{ItemDraft, ItemPatch, SectionSubmission};
