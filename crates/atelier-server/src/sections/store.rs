use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::pages::Page;

pub struct StoreBinding;

/// A print or original offered for sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    pub description: Option<String>,
    /// Display price, free text ("€120", "sold out").
    pub price: Option<String>,
    pub purchase_url: Option<String>,
}

impl SectionBinding for StoreBinding {
    const SECTION_TYPE: SectionType = SectionType::Store;
    const LABEL: &'static str = "Store";
    const MAX_ITEMS: usize = 24;
    const PAGES: &'static [Page] = &[Page::Home, Page::Store];

    type Payload = StoreItem;

    fn check(item: &StoreItem, check: &mut Checker<'_>) {
        check.required("title", &item.title, SHORT_TEXT_MAX);
        check.required_url("image_url", &item.image_url);
        check.optional("description", item.description.as_deref(), LONG_TEXT_MAX);
        check.optional("price", item.price.as_deref(), 40);
        check.optional_url("purchase_url", item.purchase_url.as_deref());
    }
}
