//! Error types for the signature crate

use picnic_params::ConfigError;
use thiserror::Error;

/// Errors that can occur during signing and verification
///
/// Every variant other than [`Error::Configuration`], [`Error::InvalidKey`]
/// and [`Error::Hashing`] is a verification rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Parameter set violates a structural constraint
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Signature bytes or fields are malformed
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Seed-tree reveal has the wrong length
    #[error("Malformed seed reveal: {context} (expected {expected} bytes, got {actual})")]
    MalformedReveal {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Merkle opening is malformed or does not reach the root
    #[error("Merkle verification failed: {0}")]
    MerkleVerification(&'static str),

    /// Simulated computation disagrees with the public output
    #[error("MPC simulation inconsistent in repetition {repetition}")]
    ProtocolInconsistency { repetition: usize },

    /// Recomputed challenge differs from the signature's
    #[error("Challenge mismatch")]
    ChallengeMismatch,

    /// Key material is malformed or the key pair is inconsistent
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Sponge misuse or primitive failure
    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl Error {
    /// True if the error is a verification rejection
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Error::Configuration(_) | Error::InvalidKey(_) | Error::Hashing(_)
        )
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedSignature(msg.into())
    }
}

impl From<picnic_algorithms::Error> for Error {
    fn from(err: picnic_algorithms::Error) -> Self {
        match err {
            picnic_algorithms::Error::Processing { .. }
            | picnic_algorithms::Error::Parameter { .. } => Error::Hashing(err.to_string()),
            other => Error::InvalidKey(other.to_string()),
        }
    }
}

// Convert to api::Error
impl From<Error> for picnic_api::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Configuration(e) => picnic_api::Error::InvalidParameter {
                context: "parameter set",
                message: e.to_string(),
            },
            Error::InvalidKey(message) => picnic_api::Error::InvalidKey {
                context: "picnic",
                message,
            },
            Error::Hashing(message) => picnic_api::Error::Other {
                context: "hashing",
                message,
            },
            rejection => picnic_api::Error::InvalidSignature {
                context: "picnic verify",
                message: rejection.to_string(),
            },
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
