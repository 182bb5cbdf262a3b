//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stored bytes do not match the layout of their declared type.
    #[error("corrupt {value_type} value: {reason}")]
    CorruptValue {
        /// Name of the declared type.
        value_type: &'static str,
        /// What was wrong with the bytes.
        reason: String,
    },

    /// An encoding or decoding error outside of a typed value.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A validation error occurred.
    #[error("validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Creates a corrupt value error for the named type.
    #[must_use]
    pub fn corrupt(value_type: &'static str, reason: impl Into<String>) -> Self {
        Self::CorruptValue { value_type, reason: reason.into() }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns `true` for errors caused by corrupt stored bytes.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptValue { .. } | Self::Encoding(_))
    }
}

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
