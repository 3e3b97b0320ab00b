//! Internal utilities for the picnic library
//!
//! Bit addressing inside byte strings, little-endian helpers for the wire
//! format and constant-time comparison. Not part of the public API.

pub mod bits;
pub mod constant_time;
pub mod endian;
