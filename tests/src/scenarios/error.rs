//! Structured error types for the scenario runner

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid parameters in scenario {name}: {source}")]
    Params {
        name: String,
        #[source]
        source: picnic_params::ConfigError,
    },

    #[error("picnic operation failed: {0}")]
    Picnic(#[from] picnic_sign::Error),

    #[error("mismatch - expected: {expected}, got: {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("tampered signature accepted: {0:?}")]
    Accepted(crate::scenarios::Tamper),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
