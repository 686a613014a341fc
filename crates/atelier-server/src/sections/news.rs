use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::pages::Page;

pub struct NewsBinding;

/// A press mention.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressMention {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publication: String,
    pub url: Option<String>,
    /// `YYYY-MM-DD`
    pub published_on: Option<String>,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
}

impl SectionBinding for NewsBinding {
    const SECTION_TYPE: SectionType = SectionType::News;
    const LABEL: &'static str = "News & press";
    const MAX_ITEMS: usize = 20;
    const PAGES: &'static [Page] = &[Page::Home, Page::News];

    type Payload = PressMention;

    fn check(mention: &PressMention, check: &mut Checker<'_>) {
        check.required("title", &mention.title, SHORT_TEXT_MAX);
        check.required("publication", &mention.publication, SHORT_TEXT_MAX);
        check.optional_url("url", mention.url.as_deref());
        check.optional_date("published_on", mention.published_on.as_deref());
        check.optional("excerpt", mention.excerpt.as_deref(), LONG_TEXT_MAX);
        check.optional_url("image_url", mention.image_url.as_deref());
    }
}
