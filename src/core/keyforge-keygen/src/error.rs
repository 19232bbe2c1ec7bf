//! Key generation error types.

use thiserror::Error;

/// Errors that can occur while generating a key.
#[derive(Debug, Error)]
pub enum KeygenError {
    /// A kind-specific parameter is out of range.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An encoder rejected its output buffer.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl KeygenError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the offending field for `InvalidParameter` errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            Self::Encoding(_) => None,
        }
    }
}
