//! Cryptographic primitives for the picnic library
//!
//! - [`xof`]: the SHAKE sponge with the one-byte domain prefixes used by the
//!   signature engine.
//! - [`block::lowmc`]: the LowMC block cipher, its constant tables and the
//!   bit-matrix type the engine multiplies share vectors with.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result};

// Block cipher implementations
pub mod block;
pub use block::lowmc::{LowMc, LowMcConstants, Matrix};

// Extendable output functions
pub mod xof;
pub use xof::{ExtendableOutputFunction, HashPrefix, PicnicHash, ShakeXof128, ShakeXof256};
