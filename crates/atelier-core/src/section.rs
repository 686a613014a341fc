use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Editable content collections of the site.
///
/// Every item and settings row belongs to exactly one section type, and no
/// storage operation crosses section types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Store,
    Artist,
    Testimonials,
    Memories,
    Workshop,
    News,
}

impl SectionType {
    pub const ALL: [SectionType; 6] = [
        SectionType::Store,
        SectionType::Artist,
        SectionType::Testimonials,
        SectionType::Memories,
        SectionType::Workshop,
        SectionType::News,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SectionType::Store => "store",
            SectionType::Artist => "artist",
            SectionType::Testimonials => "testimonials",
            SectionType::Memories => "memories",
            SectionType::Workshop => "workshop",
            SectionType::News => "news",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "store" => Ok(SectionType::Store),
            "artist" => Ok(SectionType::Artist),
            "testimonials" => Ok(SectionType::Testimonials),
            "memories" => Ok(SectionType::Memories),
            "workshop" => Ok(SectionType::Workshop),
            "news" => Ok(SectionType::News),
            _ => Err(CoreError::invalid_section_type(s)),
        }
    }
}
