//! Public API traits and types for the picnic library
//!
//! This crate provides the public API surface shared by the picnic crates:
//! the signature and serialization traits every scheme implements, and the
//! top-level error type that scheme-specific errors convert into.

pub mod error;
pub mod traits;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result};

pub use traits::{Serialize, SerializeSecret, Signature, SignatureSerialize};

// Re-export trait modules for direct access
pub use traits::{serialize, signature};
