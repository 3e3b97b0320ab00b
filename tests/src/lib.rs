//! Scenario fixtures and integration tests for the picnic library
//!
//! Scenarios are small end-to-end signing runs described in TOML under
//! `src/vectors/`. Each one names a parameter set, a deterministic key seed,
//! a message and the tampering the verifier must reject.

pub mod scenarios;
