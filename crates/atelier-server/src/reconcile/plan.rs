//! Pure diff between stored items and a submission.

use std::collections::{HashMap, HashSet};

use atelier_core::parse_real_id;
use atelier_storage::SectionItem;
use serde_json::Value;
use uuid::Uuid;

use super::submission::ItemDraft;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUpdate {
    pub id: Uuid,
    pub data: Value,
    pub order: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInsert {
    pub data: Value,
    pub order: u32,
    pub is_active: bool,
}

/// What a save will do to one section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub updates: Vec<PlannedUpdate>,
    pub inserts: Vec<PlannedInsert>,
    pub deletes: HashSet<Uuid>,
    /// Stored items kept only because deletion was suppressed, with the order
    /// they move to (after every submitted item).
    pub retained: Vec<(Uuid, u32)>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
            && self.inserts.is_empty()
            && self.deletes.is_empty()
            && self.retained.is_empty()
    }
}

/// Classifies each draft as an update (its id is a stored item of the section)
/// or an insert (anything else), and picks the stored items to delete.
///
/// `existing` must be the section's items ascending by `order`. A draft's
/// position is its new `order`.
///
/// Stored items absent from the submission are deleted only when at least one
/// draft refers to a stored item, or when `delete_missing` is set. Otherwise
/// they stay and are renumbered after the submitted items.
pub fn plan(existing: &[SectionItem], drafts: &[ItemDraft], delete_missing: bool) -> ReconcilePlan {
    let existing_ids: HashMap<Uuid, &SectionItem> =
        existing.iter().map(|item| (item.id, item)).collect();

    let mut result = ReconcilePlan::default();
    let mut submitted = HashSet::new();

    for (index, draft) in drafts.iter().enumerate() {
        let order = index as u32;
        match parse_real_id(draft.id.as_deref()).filter(|id| existing_ids.contains_key(id)) {
            Some(id) if submitted.insert(id) => result.updates.push(PlannedUpdate {
                id,
                data: draft.data.clone(),
                order,
                is_active: draft.is_active,
            }),
            _ => result.inserts.push(PlannedInsert {
                data: draft.data.clone(),
                order,
                is_active: draft.is_active,
            }),
        }
    }

    let missing = existing.iter().filter(|item| !submitted.contains(&item.id));
    if delete_missing || !submitted.is_empty() {
        result.deletes = missing.map(|item| item.id).collect();
    } else {
        let mut next = drafts.len() as u32;
        for item in missing {
            if item.order != next {
                result.retained.push((item.id, next));
            }
            next += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::SectionType;
    use serde_json::json;
    use time::OffsetDateTime;

    fn stored(order: u32) -> SectionItem {
        SectionItem::new(
            SectionType::Store,
            json!({ "title": format!("stored {order}") }),
            order,
            true,
            OffsetDateTime::now_utc(),
        )
    }

    fn draft(id: Option<String>, title: &str) -> ItemDraft {
        ItemDraft {
            id,
            data: json!({ "title": title }),
            is_active: true,
            order: None,
        }
    }

    #[test]
    fn update_insert_delete_classification() {
        let a = stored(0);
        let b = stored(1);
        let drafts = vec![
            draft(Some(b.id.to_string()), "B"),
            draft(Some("temp-1".into()), "new"),
        ];

        let plan = plan(&[a.clone(), b.clone()], &drafts, false);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, b.id);
        assert_eq!(plan.updates[0].order, 0);
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts[0].order, 1);
        assert_eq!(plan.deletes, HashSet::from([a.id]));
        assert!(plan.retained.is_empty());
    }

    #[test]
    fn unknown_real_id_is_an_insert() {
        let a = stored(0);
        let foreign = Uuid::new_v4().to_string();
        let plan = plan(&[a.clone()], &[draft(Some(foreign), "x")], false);

        assert!(plan.updates.is_empty());
        assert_eq!(plan.inserts.len(), 1);
        // No submitted id matched a stored item, so nothing is deleted.
        assert!(plan.deletes.is_empty());
        assert_eq!(plan.retained, vec![(a.id, 1)]);
    }

    #[test]
    fn malformed_id_is_an_insert() {
        let plan = plan(&[], &[draft(Some("not-a-uuid".into()), "x")], false);
        assert_eq!(plan.inserts.len(), 1);
    }

    #[test]
    fn guard_suppresses_deletes_for_all_new_submission() {
        let a = stored(0);
        let b = stored(1);
        let plan = plan(&[a.clone(), b.clone()], &[draft(None, "fresh")], false);

        assert!(plan.deletes.is_empty());
        assert_eq!(plan.retained, vec![(a.id, 1), (b.id, 2)]);
    }

    #[test]
    fn guard_keeps_everything_on_empty_submission() {
        let items = [stored(0), stored(1)];
        let plan = plan(&items, &[], false);
        assert!(plan.is_noop());
    }

    #[test]
    fn delete_missing_prunes_everything_unsubmitted() {
        let items = [stored(0), stored(1)];
        let plan = plan(&items, &[], true);
        assert_eq!(plan.deletes.len(), 2);
        assert!(plan.retained.is_empty());
    }

    #[test]
    fn repeated_id_only_updates_once() {
        let a = stored(0);
        let drafts = vec![
            draft(Some(a.id.to_string()), "first"),
            draft(Some(a.id.to_string()), "second"),
        ];
        let plan = plan(&[a], &drafts, false);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts[0].order, 1);
    }
}
