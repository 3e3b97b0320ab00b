//! Traits implemented by the signature schemes in this library

pub mod serialize;
pub mod signature;

pub use serialize::{Serialize, SerializeSecret};
pub use signature::{Signature, SignatureSerialize};
