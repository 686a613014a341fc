use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, LONG_TEXT_MAX};
use crate::pages::Page;

pub struct ArtistBinding;

/// One bio statistic, e.g. `{ label: "Exhibitions", value: "40+" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtistStat {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    pub description: Option<String>,
}

impl SectionBinding for ArtistBinding {
    const SECTION_TYPE: SectionType = SectionType::Artist;
    const LABEL: &'static str = "Artist";
    const MAX_ITEMS: usize = 8;
    const PAGES: &'static [Page] = &[Page::Home, Page::About];

    type Payload = ArtistStat;

    fn check(stat: &ArtistStat, check: &mut Checker<'_>) {
        check.required("label", &stat.label, 60);
        check.required("value", &stat.value, 60);
        check.optional("description", stat.description.as_deref(), LONG_TEXT_MAX);
    }
}
