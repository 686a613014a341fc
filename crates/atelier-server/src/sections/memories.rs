use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::pages::Page;

pub struct MemoriesBinding;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Memory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    pub description: Option<String>,
    pub year: Option<i32>,
}

impl SectionBinding for MemoriesBinding {
    const SECTION_TYPE: SectionType = SectionType::Memories;
    const LABEL: &'static str = "Memories";
    const MAX_ITEMS: usize = 30;
    const PAGES: &'static [Page] = &[Page::About];

    type Payload = Memory;

    fn check(memory: &Memory, check: &mut Checker<'_>) {
        check.required("title", &memory.title, SHORT_TEXT_MAX);
        check.required_url("image_url", &memory.image_url);
        check.optional("description", memory.description.as_deref(), LONG_TEXT_MAX);
        if let Some(year) = memory.year {
            check.range("year", i64::from(year), 1900, 2100);
        }
    }
}
