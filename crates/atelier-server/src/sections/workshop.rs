use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, SHORT_TEXT_MAX};
use crate::pages::Page;

pub struct WorkshopBinding;

/// A studio photo.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkshopPhoto {
    #[serde(default)]
    pub image_url: String,
    pub caption: Option<String>,
    pub alt: Option<String>,
}

impl SectionBinding for WorkshopBinding {
    const SECTION_TYPE: SectionType = SectionType::Workshop;
    const LABEL: &'static str = "Workshop";
    const MAX_ITEMS: usize = 40;
    const PAGES: &'static [Page] = &[Page::Home, Page::Gallery];

    type Payload = WorkshopPhoto;

    fn check(photo: &WorkshopPhoto, check: &mut Checker<'_>) {
        check.required_url("image_url", &photo.image_url);
        check.optional("caption", photo.caption.as_deref(), SHORT_TEXT_MAX);
        check.optional("alt", photo.alt.as_deref(), SHORT_TEXT_MAX);
    }
}
