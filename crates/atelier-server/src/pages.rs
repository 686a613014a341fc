//! Public page composition.

use std::fmt;
use std::str::FromStr;

use atelier_core::SectionType;
use atelier_storage::{SectionStore, SettingsFields, StorageError};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::sections::{Binding, all_bindings};

/// Public pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    About,
    Gallery,
    News,
    Store,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Home, Page::About, Page::Gallery, Page::News, Page::Store];

    pub const fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Gallery => "gallery",
            Page::News => "news",
            Page::Store => "store",
        }
    }

    /// Render path pattern with a `[locale]` segment, as used for invalidation.
    pub fn route_pattern(&self) -> String {
        match self {
            Page::Home => "/[locale]".to_string(),
            page => format!("/[locale]/{}", page.slug()),
        }
    }

    /// Concrete render path for a locale, used as the render cache key.
    pub fn render_path(&self, locale: &str) -> String {
        match self {
            Page::Home => format!("/{locale}"),
            page => format!("/{locale}/{}", page.slug()),
        }
    }

    /// Bindings of the sections rendered on this page.
    pub fn sections(&self) -> impl Iterator<Item = &'static Binding> + '_ {
        all_bindings().filter(move |b| b.pages.contains(self))
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown page '{0}'")]
pub struct UnknownPage(pub String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: Page,
    pub locale: String,
    pub sections: Vec<PageSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSection {
    pub section_type: SectionType,
    pub label: &'static str,
    pub settings: SettingsFields,
    pub items: Vec<PublicItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicItem {
    pub id: Uuid,
    pub order: u32,
    pub data: Value,
}

/// Builds the public view of a page.
///
/// Sections appear by `display_order`; sections that are inactive or were
/// never configured are left out. Each section lists its active items in
/// `order`, capped at its `max_items`.
pub async fn compose_page(
    store: &dyn SectionStore,
    page: Page,
    locale: &str,
) -> Result<PageView, StorageError> {
    let mut configured: Vec<(&'static Binding, SettingsFields)> = Vec::new();
    for binding in page.sections() {
        match store.get_settings(binding.section_type).await? {
            Some(settings) if settings.fields.is_active => {
                configured.push((binding, settings.fields));
            }
            _ => {}
        }
    }
    configured.sort_by_key(|(binding, fields)| (fields.display_order, binding.section_type));

    let mut sections = Vec::with_capacity(configured.len());
    for (binding, settings) in configured {
        let limit = usize::try_from(settings.max_items).unwrap_or(0);
        let items = store
            .list_items(binding.section_type)
            .await?
            .into_iter()
            .filter(|item| item.is_active)
            .take(limit)
            .map(|item| PublicItem {
                id: item.id,
                order: item.order,
                data: item.data,
            })
            .collect();
        sections.push(PageSection {
            section_type: binding.section_type,
            label: binding.label,
            settings,
            items,
        });
    }

    Ok(PageView {
        page,
        locale: locale.to_string(),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_db_memory::InMemoryStore;
    use atelier_storage::SectionItem;
    use serde_json::json;
    use time::OffsetDateTime;

    fn settings(display_order: i32, max_items: i32, is_active: bool) -> SettingsFields {
        SettingsFields {
            section_title: "Section".into(),
            section_description: String::new(),
            badge_text: String::new(),
            max_items,
            is_active,
            display_order,
        }
    }

    async fn add(store: &InMemoryStore, section_type: SectionType, order: u32, is_active: bool) {
        let item = SectionItem::new(
            section_type,
            json!({ "n": order }),
            order,
            is_active,
            OffsetDateTime::now_utc(),
        );
        store.upsert_item(&item).await.unwrap();
    }

    #[test]
    fn paths() {
        assert_eq!(Page::Home.render_path("en"), "/en");
        assert_eq!(Page::Gallery.render_path("fr"), "/fr/gallery");
        assert_eq!(Page::News.route_pattern(), "/[locale]/news");
        assert_eq!("store".parse::<Page>().unwrap(), Page::Store);
        assert!("admin".parse::<Page>().is_err());
    }

    #[test]
    fn page_membership_follows_bindings() {
        let home: Vec<SectionType> = Page::Home.sections().map(|b| b.section_type).collect();
        assert_eq!(
            home,
            vec![
                SectionType::Store,
                SectionType::Artist,
                SectionType::Testimonials,
                SectionType::Workshop,
                SectionType::News
            ]
        );
        let about: Vec<SectionType> = Page::About.sections().map(|b| b.section_type).collect();
        assert_eq!(about, vec![SectionType::Artist, SectionType::Memories]);
    }

    #[tokio::test]
    async fn compose_orders_filters_and_truncates() {
        let store = InMemoryStore::new();
        store.upsert_settings(SectionType::Artist, &settings(2, 2, true)).await.unwrap();
        store.upsert_settings(SectionType::Workshop, &settings(1, 8, true)).await.unwrap();
        store.upsert_settings(SectionType::News, &settings(0, 8, false)).await.unwrap();

        for order in 0..4 {
            add(&store, SectionType::Artist, order, order != 1).await;
        }
        add(&store, SectionType::Workshop, 0, true).await;
        add(&store, SectionType::News, 0, true).await;
        // Testimonials has items but no settings.
        add(&store, SectionType::Testimonials, 0, true).await;

        let view = compose_page(&store, Page::Home, "en").await.unwrap();
        let types: Vec<SectionType> = view.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Workshop, SectionType::Artist]);

        let artist_orders: Vec<u32> = view.sections[1].items.iter().map(|i| i.order).collect();
        assert_eq!(artist_orders, vec![0, 2]);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_page() {
        let store = InMemoryStore::new();
        let view = compose_page(&store, Page::Gallery, "en").await.unwrap();
        assert!(view.sections.is_empty());
        assert_eq!(view.locale, "en");
    }
}
