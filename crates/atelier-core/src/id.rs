//! Section item identifiers.
//!
//! Persisted items are keyed by UUIDs. Admin clients may submit drafts carrying
//! a placeholder id (`temp-...`) for rows they have not saved yet; those ids are
//! never used as lookup keys.

use thiserror::Error;
use uuid::Uuid;

/// Reserved prefix for client-generated placeholder ids.
pub const TEMP_ID_PREFIX: &str = "temp-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Temporary identifier is not a persisted id: {0}")]
    Temporary(String),
    #[error("Malformed identifier: {0}")]
    Malformed(String),
}

pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Returns `true` for client placeholder ids.
pub fn is_temporary_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// Parses an id that must refer to a persisted row.
pub fn validate_id(id: &str) -> Result<Uuid, IdError> {
    if is_temporary_id(id) {
        return Err(IdError::Temporary(id.to_string()));
    }
    Uuid::parse_str(id).map_err(|_| IdError::Malformed(id.to_string()))
}

/// Returns the UUID only when the draft id is real-format: well-formed and not
/// a placeholder. Absent, temporary and malformed ids all yield `None`.
pub fn parse_real_id(id: Option<&str>) -> Option<Uuid> {
    id.and_then(|raw| validate_id(raw.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_real() {
        let id = generate_id().to_string();
        assert!(!is_temporary_id(&id));
        assert!(parse_real_id(Some(&id)).is_some());
    }

    #[test]
    fn temporary_ids_are_rejected() {
        assert!(is_temporary_id("temp-1"));
        assert_eq!(parse_real_id(Some("temp-1")), None);
        assert_eq!(
            validate_id("temp-1"),
            Err(IdError::Temporary("temp-1".to_string()))
        );
    }

    #[test]
    fn temporary_prefix_wins_over_uuid_shape() {
        let id = format!("{TEMP_ID_PREFIX}{}", Uuid::new_v4());
        assert_eq!(parse_real_id(Some(&id)), None);
    }

    #[test]
    fn malformed_and_absent_ids() {
        assert_eq!(parse_real_id(None), None);
        assert_eq!(parse_real_id(Some("")), None);
        assert_eq!(parse_real_id(Some("A")), None);
        assert!(matches!(validate_id("not-a-uuid"), Err(IdError::Malformed(_))));
    }
}
