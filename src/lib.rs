//! # picnic
//!
//! A pure Rust implementation of the Picnic2 post-quantum signature scheme.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! picnic = "0.3"
//! ```
//!
//! ## Features
//!
//! - `parallel`: run independent MPC repetitions on the rayon thread pool
//! - `serde`: serde support for parameter sets and in-memory signatures
//! - `full`: All features enabled
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`picnic-api`]: Signature and serialization traits, top-level error
//! - [`picnic-internal`]: Bit access, constant-time helpers, endian codecs
//! - [`picnic-params`]: Parameter sets and presets
//! - [`picnic-algorithms`]: LowMC and the domain-separated SHAKE hashes
//! - [`picnic-sign`]: The Picnic2 signing engine

pub use picnic_algorithms as algorithms;
pub use picnic_api as api;
pub use picnic_internal as internal;
pub use picnic_params as params;
pub use picnic_sign as sign;

/// Common imports for picnic users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export core traits
    pub use crate::api::{Serialize, SerializeSecret, Signature, SignatureSerialize};

    pub use crate::params::{ParameterSet, PICNIC2_L1_FS, PICNIC2_L3_FS, PICNIC2_L5_FS};

    pub use crate::sign::{Picnic2L1Fs, Picnic2L3Fs, Picnic2L5Fs};
}
