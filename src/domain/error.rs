//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the record and tree contracts.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("empty path in record at index {index}")]
    EmptyPath { index: usize },

    #[error("unsupported document shape: {0}")]
    UnsupportedShape(String),
}

impl DomainError {
    pub(crate) fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
