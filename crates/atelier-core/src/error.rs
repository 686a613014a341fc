use thiserror::Error;

/// Core error types for Atelier operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid section type: {0}")]
    InvalidSectionType(String),
}

impl CoreError {
    /// Create a new InvalidSectionType error
    pub fn invalid_section_type(section_type: impl Into<String>) -> Self {
        Self::InvalidSectionType(section_type.into())
    }
}
