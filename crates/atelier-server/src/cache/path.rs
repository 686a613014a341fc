use std::fmt;

use serde::{Deserialize, Serialize};

/// How a [`PathSpec`] matches concrete paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Exactly the pattern.
    Page,
    /// The pattern and everything below it.
    Layout,
}

/// A logical render path pattern. Segments written as `[name]` match any
/// single concrete segment, e.g. `/[locale]/gallery`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSpec {
    pub pattern: String,
    pub kind: PathKind,
}

impl PathSpec {
    pub fn page(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: PathKind::Page,
        }
    }

    pub fn layout(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: PathKind::Layout,
        }
    }

    /// Returns `true` if `path` is covered by this spec.
    pub fn matches(&self, path: &str) -> bool {
        let pattern: Vec<&str> = segments(&self.pattern).collect();
        let concrete: Vec<&str> = segments(path).collect();

        let length_ok = match self.kind {
            PathKind::Page => concrete.len() == pattern.len(),
            PathKind::Layout => concrete.len() >= pattern.len(),
        };
        length_ok
            && pattern
                .iter()
                .zip(&concrete)
                .all(|(p, c)| is_dynamic(p) || p == c)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PathKind::Page => "page",
            PathKind::Layout => "layout",
        };
        write!(f, "{} ({kind})", self.pattern)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_dynamic(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_matches_exact_depth_only() {
        let spec = PathSpec::page("/[locale]/gallery");
        assert!(spec.matches("/en/gallery"));
        assert!(spec.matches("/fr/gallery/"));
        assert!(!spec.matches("/en"));
        assert!(!spec.matches("/en/gallery/2024"));
        assert!(!spec.matches("/en/news"));
    }

    #[test]
    fn home_page_pattern() {
        let spec = PathSpec::page("/[locale]");
        assert!(spec.matches("/en"));
        assert!(!spec.matches("/en/about"));
        assert!(!spec.matches("/"));
    }

    #[test]
    fn layout_matches_subtree() {
        let spec = PathSpec::layout("/[locale]");
        assert!(spec.matches("/en"));
        assert!(spec.matches("/en/about"));
        assert!(spec.matches("/pt-BR/admin/store"));
        assert!(!spec.matches("/"));
    }

    #[test]
    fn literal_brackets_need_a_name() {
        let spec = PathSpec::page("/[]/x");
        assert!(!spec.matches("/en/x"));
    }
}
