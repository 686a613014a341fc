//! Per-section bindings: payload schema, item limit, label and the public
//! pages that render the section.
//!
//! The reconciler is generic; everything section-specific lives here. A
//! binding is declared once as a [`SectionBinding`] impl and erased into a
//! [`Binding`] so handlers can look it up from a path segment.

mod artist;
mod memories;
mod news;
mod store;
mod testimonials;
pub mod validate;
mod workshop;

use std::collections::HashSet;

use atelier_api::FieldIssue;
use atelier_core::{SectionType, parse_real_id};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use artist::{ArtistBinding, ArtistStat};
pub use memories::{MemoriesBinding, Memory};
pub use news::{NewsBinding, PressMention};
pub use store::{StoreBinding, StoreItem};
pub use testimonials::{Testimonial, TestimonialsBinding};
pub use validate::Checker;
pub use workshop::{WorkshopBinding, WorkshopPhoto};

use crate::cache::PathSpec;
use crate::pages::Page;
use crate::reconcile::SectionSubmission;

/// Static description of one section type.
pub trait SectionBinding {
    const SECTION_TYPE: SectionType;
    const LABEL: &'static str;
    const MAX_ITEMS: usize;
    const PAGES: &'static [Page];

    /// Item payload shape. Unknown fields must be rejected.
    type Payload: DeserializeOwned;

    /// Field-level checks serde cannot express.
    fn check(payload: &Self::Payload, check: &mut Checker<'_>);
}

/// Type-erased [`SectionBinding`].
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub section_type: SectionType,
    pub label: &'static str,
    pub max_items: usize,
    pub pages: &'static [Page],
    validate_data: fn(&Value, &str, &mut Vec<FieldIssue>),
}

fn validate_payload<B: SectionBinding>(data: &Value, path: &str, issues: &mut Vec<FieldIssue>) {
    match B::Payload::deserialize(data) {
        Ok(payload) => B::check(&payload, &mut Checker::new(path, issues)),
        Err(err) => issues.push(FieldIssue::new(path, err.to_string())),
    }
}

impl Binding {
    pub const fn of<B: SectionBinding>() -> Self {
        Self {
            section_type: B::SECTION_TYPE,
            label: B::LABEL,
            max_items: B::MAX_ITEMS,
            pages: B::PAGES,
            validate_data: validate_payload::<B>,
        }
    }

    /// Validates one item payload, reporting issues under `path`.
    pub fn validate_data(&self, data: &Value, path: &str, issues: &mut Vec<FieldIssue>) {
        (self.validate_data)(data, path, issues)
    }

    /// Validates a whole save request. All issues are collected before
    /// returning.
    pub fn validate_submission(&self, submission: &SectionSubmission) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if submission.items.len() > self.max_items {
            issues.push(FieldIssue::new(
                "items",
                format!(
                    "{} accepts at most {} items (got {})",
                    self.label,
                    self.max_items,
                    submission.items.len()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for (i, draft) in submission.items.iter().enumerate() {
            if let Some(id) = parse_real_id(draft.id.as_deref())
                && !seen.insert(id)
            {
                issues.push(FieldIssue::new(
                    format!("items[{i}].id"),
                    format!("duplicate id {id}"),
                ));
            }
            self.validate_data(&draft.data, &format!("items[{i}].data"), &mut issues);
        }

        validate::check_settings(&submission.settings, self.max_items, &mut issues);

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    /// Rendered paths that show this section: its public pages in every
    /// locale plus its admin editor.
    pub fn invalidation_paths(&self) -> Vec<PathSpec> {
        self.pages
            .iter()
            .map(|page| PathSpec::page(page.route_pattern()))
            .chain(std::iter::once(PathSpec::page(format!(
                "/[locale]/admin/{}",
                self.section_type
            ))))
            .collect()
    }
}

static STORE: Binding = Binding::of::<StoreBinding>();
static ARTIST: Binding = Binding::of::<ArtistBinding>();
static TESTIMONIALS: Binding = Binding::of::<TestimonialsBinding>();
static MEMORIES: Binding = Binding::of::<MemoriesBinding>();
static WORKSHOP: Binding = Binding::of::<WorkshopBinding>();
static NEWS: Binding = Binding::of::<NewsBinding>();

pub fn binding_for(section_type: SectionType) -> &'static Binding {
    match section_type {
        SectionType::Store => &STORE,
        SectionType::Artist => &ARTIST,
        SectionType::Testimonials => &TESTIMONIALS,
        SectionType::Memories => &MEMORIES,
        SectionType::Workshop => &WORKSHOP,
        SectionType::News => &NEWS,
    }
}

pub fn all_bindings() -> impl Iterator<Item = &'static Binding> {
    SectionType::ALL.into_iter().map(binding_for)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ItemDraft;
    use atelier_storage::SettingsFields;
    use serde_json::json;

    fn sample(section_type: SectionType) -> Value {
        match section_type {
            SectionType::Store => json!({
                "title": "Harbour at dusk",
                "image_url": "https://cdn.example.com/harbour.jpg",
                "price": "€180",
                "purchase_url": "https://shop.example.com/harbour"
            }),
            SectionType::Artist => json!({ "label": "Exhibitions", "value": "40+" }),
            SectionType::Testimonials => json!({ "quote": "Wonderful class", "author": "Ana" }),
            SectionType::Memories => json!({
                "title": "First studio",
                "image_url": "https://cdn.example.com/studio.jpg",
                "year": 2009
            }),
            SectionType::Workshop => json!({ "image_url": "https://cdn.example.com/w1.jpg" }),
            SectionType::News => json!({
                "title": "Interview",
                "publication": "Daily Art",
                "published_on": "2024-05-02"
            }),
        }
    }

    fn settings(max_items: i32) -> SettingsFields {
        SettingsFields {
            section_title: "Title".into(),
            section_description: String::new(),
            badge_text: String::new(),
            max_items,
            is_active: true,
            display_order: 0,
        }
    }

    fn draft(id: Option<&str>, data: Value) -> ItemDraft {
        ItemDraft {
            id: id.map(str::to_string),
            data,
            is_active: true,
            order: None,
        }
    }

    #[test]
    fn every_binding_accepts_its_sample() {
        for binding in all_bindings() {
            let mut issues = Vec::new();
            binding.validate_data(&sample(binding.section_type), "data", &mut issues);
            assert!(issues.is_empty(), "{}: {issues:?}", binding.section_type);
        }
    }

    #[test]
    fn unknown_fields_rejected() {
        let mut data = sample(SectionType::Workshop);
        data["photographer"] = json!("me");
        let mut issues = Vec::new();
        binding_for(SectionType::Workshop).validate_data(&data, "items[0].data", &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "items[0].data");
        assert!(issues[0].message.contains("photographer"));
    }

    #[test]
    fn non_object_payload_rejected() {
        let mut issues = Vec::new();
        binding_for(SectionType::Artist).validate_data(&json!("text"), "data", &mut issues);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn field_issues_are_collected() {
        let data = json!({ "title": "", "image_url": "not a url", "purchase_url": "ftp://x" });
        let mut issues = Vec::new();
        binding_for(SectionType::Store).validate_data(&data, "items[1].data", &mut issues);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "items[1].data.title",
                "items[1].data.image_url",
                "items[1].data.purchase_url"
            ]
        );
    }

    #[test]
    fn bad_news_date_rejected() {
        let mut data = sample(SectionType::News);
        data["published_on"] = json!("May 2nd");
        let mut issues = Vec::new();
        binding_for(SectionType::News).validate_data(&data, "data", &mut issues);
        assert_eq!(issues[0].path, "data.published_on");
    }

    #[test]
    fn submission_item_limit() {
        let binding = binding_for(SectionType::Artist);
        let submission = SectionSubmission {
            items: (0..9)
                .map(|_| draft(None, sample(SectionType::Artist)))
                .collect(),
            settings: settings(8),
            delete_missing: false,
        };
        let issues = binding.validate_submission(&submission).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "items");
    }

    #[test]
    fn submission_duplicate_real_ids() {
        let id = atelier_core::generate_id().to_string();
        let data = sample(SectionType::Testimonials);
        let submission = SectionSubmission {
            items: vec![
                draft(Some(&id), data.clone()),
                draft(Some("temp-1"), data.clone()),
                draft(Some("temp-1"), data.clone()),
                draft(Some(&id), data),
            ],
            settings: settings(4),
            delete_missing: false,
        };
        let issues = binding_for(SectionType::Testimonials)
            .validate_submission(&submission)
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "items[3].id");
    }

    #[test]
    fn settings_max_items_bounded_by_binding() {
        let submission = SectionSubmission {
            items: Vec::new(),
            settings: settings(13),
            delete_missing: false,
        };
        let issues = binding_for(SectionType::Testimonials)
            .validate_submission(&submission)
            .unwrap_err();
        assert_eq!(issues[0].path, "settings.max_items");
    }

    #[test]
    fn invalidation_paths_cover_pages_and_admin() {
        let patterns: Vec<String> = binding_for(SectionType::Workshop)
            .invalidation_paths()
            .into_iter()
            .map(|p| p.pattern)
            .collect();
        assert_eq!(
            patterns,
            vec!["/[locale]", "/[locale]/gallery", "/[locale]/admin/workshop"]
        );
    }
}
