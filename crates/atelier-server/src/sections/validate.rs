//! Field checks shared by the section bindings.

use atelier_api::FieldIssue;
use atelier_storage::SettingsFields;
use time::Date;
use time::macros::format_description;

pub const SHORT_TEXT_MAX: usize = 200;
pub const LONG_TEXT_MAX: usize = 2000;
pub const URL_MAX: usize = 2048;

pub const SECTION_TITLE_MAX: usize = 120;
pub const SECTION_DESCRIPTION_MAX: usize = 500;
pub const BADGE_TEXT_MAX: usize = 40;

/// Collects issues under a common path prefix such as `items[3].data`.
pub struct Checker<'a> {
    base: &'a str,
    issues: &'a mut Vec<FieldIssue>,
}

impl<'a> Checker<'a> {
    pub fn new(base: &'a str, issues: &'a mut Vec<FieldIssue>) -> Self {
        Self { base, issues }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        let path = if self.base.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.base)
        };
        self.issues.push(FieldIssue::new(path, message));
    }

    pub fn required(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        } else {
            self.max_len(field, value, max);
        }
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.push(field, format!("must be at most {max} characters (got {len})"));
        }
    }

    pub fn required_url(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        } else {
            self.url(field, value);
        }
    }

    pub fn optional_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.url(field, value);
        }
    }

    fn url(&mut self, field: &str, value: &str) {
        if value.len() > URL_MAX {
            self.push(field, format!("must be at most {URL_MAX} characters"));
        } else if !is_web_url(value) {
            self.push(field, "must be an absolute http(s) URL");
        }
    }

    pub fn optional_date(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty())
            && parse_date(value).is_none()
        {
            self.push(field, "must be a date formatted as YYYY-MM-DD");
        }
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
    }
}

pub fn is_web_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

/// Checks the settings object of a submission against a section's item limit.
pub fn check_settings(fields: &SettingsFields, binding_max: usize, issues: &mut Vec<FieldIssue>) {
    let mut check = Checker::new("settings", issues);
    check.required("section_title", &fields.section_title, SECTION_TITLE_MAX);
    check.max_len(
        "section_description",
        &fields.section_description,
        SECTION_DESCRIPTION_MAX,
    );
    check.max_len("badge_text", &fields.badge_text, BADGE_TEXT_MAX);
    check.range("max_items", i64::from(fields.max_items), 1, binding_max as i64);
    if fields.display_order < 0 {
        check.push("display_order", "must not be negative");
    }
}
