//! Error type shared across the public API

use thiserror::Error;

/// Primary error type for cryptographic operations
///
/// Scheme crates keep their own richer error enums and convert into this one
/// at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid key error
    #[error("Invalid key: {context}: {message}")]
    InvalidKey {
        context: &'static str,
        message: String,
    },

    /// Invalid signature error; verification rejects
    #[error("Invalid signature: {context}: {message}")]
    InvalidSignature {
        context: &'static str,
        message: String,
    },

    /// Invalid length error with context
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid parameter error
    #[error("{context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: String,
    },

    /// Other error
    #[error("{context}: {message}")]
    Other {
        context: &'static str,
        message: String,
    },
}

/// Result type for cryptographic operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Replace the context of an existing error
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidKey { message, .. } => Self::InvalidKey { context, message },
            Self::InvalidSignature { message, .. } => Self::InvalidSignature { context, message },
            Self::InvalidLength { expected, actual, .. } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            Self::Other { message, .. } => Self::Other { context, message },
        }
    }

    /// True if this error means a signature was rejected
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_keeps_payload() {
        let err = Error::InvalidLength {
            context: "a",
            expected: 3,
            actual: 4,
        }
        .with_context("b");
        assert_eq!(
            err,
            Error::InvalidLength {
                context: "b",
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidSignature {
            context: "picnic",
            message: "challenge mismatch".into(),
        };
        assert_eq!(err.to_string(), "Invalid signature: picnic: challenge mismatch");
        assert!(err.is_rejection());
    }
}
