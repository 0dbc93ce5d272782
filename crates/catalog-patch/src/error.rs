//! Error types for patch construction.

use thiserror::Error;

use crate::urn::UrnError;

/// Result type alias for patch builder operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Contract violations raised synchronously by the call that caused them.
///
/// A call that returns one of these has not touched the accumulator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Identifier is malformed, or names the wrong kind of entity for the builder.
    #[error("invalid identifier {urn:?}: {reason}")]
    InvalidIdentifier { urn: String, reason: String },

    /// Relationship target has an unexpected type qualifier.
    #[error("{context}: expected a {expected} urn, got {found} ({urn})")]
    InvalidUrnType {
        urn: String,
        expected: &'static str,
        found: String,
        context: &'static str,
    },

    /// A required scalar field was given an empty value.
    #[error("{field} must not be empty")]
    RequiredField { field: &'static str },

    /// Empty aspect name, empty path, or a path the codec rejects.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Structurally empty key or similar argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PatchError {
    #[inline]
    pub fn invalid_identifier(urn: impl Into<String>, reason: impl Into<String>) -> Self {
        PatchError::InvalidIdentifier {
            urn: urn.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn invalid_path(message: impl Into<String>) -> Self {
        PatchError::InvalidPath(message.into())
    }

    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PatchError::InvalidArgument(message.into())
    }
}

impl From<UrnError> for PatchError {
    fn from(err: UrnError) -> Self {
        match err {
            UrnError::Malformed { urn, reason } => PatchError::InvalidIdentifier {
                urn,
                reason: reason.to_string(),
            },
        }
    }
}
