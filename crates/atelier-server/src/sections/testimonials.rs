use atelier_core::SectionType;
use serde::Deserialize;

use super::SectionBinding;
use super::validate::{Checker, LONG_TEXT_MAX, SHORT_TEXT_MAX};
use crate::pages::Page;

pub struct TestimonialsBinding;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Testimonial {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub author: String,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
}

impl SectionBinding for TestimonialsBinding {
    const SECTION_TYPE: SectionType = SectionType::Testimonials;
    const LABEL: &'static str = "Testimonials";
    const MAX_ITEMS: usize = 12;
    const PAGES: &'static [Page] = &[Page::Home];

    type Payload = Testimonial;

    fn check(t: &Testimonial, check: &mut Checker<'_>) {
        check.required("quote", &t.quote, LONG_TEXT_MAX);
        check.required("author", &t.author, SHORT_TEXT_MAX);
        check.optional("role", t.role.as_deref(), SHORT_TEXT_MAX);
        check.optional_url("avatar_url", t.avatar_url.as_deref());
    }
}
