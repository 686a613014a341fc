//! Storage error types for the section storage abstraction layer.
//!
//! This module defines all error types that can occur during storage operations.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested section item was not found.
    #[error("Section item not found: {section_type}/{id}")]
    NotFound {
        /// The section the item was looked up in.
        section_type: String,
        /// The ID of the item that was not found.
        id: String,
    },

    /// A write collided with an existing row (e.g. an id owned by another section).
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The row data is invalid for the backend.
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description of why the data is invalid.
        message: String,
    },

    /// An error occurred during a transaction.
    #[error("Transaction error: {message}")]
    TransactionError {
        /// Description of the transaction error.
        message: String,
    },

    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(section_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            section_type: section_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidData` error.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Creates a new `TransactionError` error.
    #[must_use]
    pub fn transaction_error(message: impl Into<String>) -> Self {
        Self::TransactionError {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::InvalidData { .. } => ErrorCategory::Validation,
            Self::TransactionError { .. } => ErrorCategory::Transaction,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Item not found.
    NotFound,
    /// Conflicting write.
    Conflict,
    /// Validation error.
    Validation,
    /// Transaction-related error.
    Transaction,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Transaction => write!(f, "transaction"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("store", "123");
        assert_eq!(err.to_string(), "Section item not found: store/123");

        let err = StorageError::conflict("id owned by testimonials");
        assert_eq!(err.to_string(), "Conflict: id owned by testimonials");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("store", "123");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());

        let err = StorageError::conflict("dup");
        assert!(!err.is_not_found());
        assert!(err.is_conflict());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("store", "123").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::invalid_data("bad order").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::connection_error("refused").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Transaction.to_string(), "transaction");
    }
}
