//! Digital Signature Schemes
//!
//! This crate implements the Picnic2 post-quantum signature scheme: a
//! Fiat-Shamir transformed MPC-in-the-head proof of knowledge of a LowMC
//! key.

pub mod error;
pub mod pq;

pub use error::{Error, Result};

// Re-exports from post-quantum schemes
pub use pq::picnic::{Picnic, Picnic2L1Fs, Picnic2L3Fs, Picnic2L5Fs};
