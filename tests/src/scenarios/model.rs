//! Serde model of a scenario file

use picnic_params::ParameterSet;
use serde::Deserialize;

use super::error::{Result, ScenarioError};

/// Top-level TOML document: a list of `[[scenario]]` tables
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub scenario: Vec<Scenario>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub parties: u16,
    pub repetitions: u16,
    pub opened: u16,
    #[serde(default = "default_state_bits")]
    pub state_bits: usize,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    #[serde(default = "default_sboxes")]
    pub sboxes: usize,
    #[serde(default = "default_seed_bytes")]
    pub seed_bytes: usize,
    #[serde(default = "default_salt_bytes")]
    pub salt_bytes: usize,
    #[serde(default = "default_digest_bytes")]
    pub digest_bytes: usize,
    /// Seed for the key-generation RNG
    pub rng_seed: u64,
    /// Message bytes, hex encoded
    pub message: String,
    /// Each entry is applied to a fresh copy of the valid signature
    #[serde(default)]
    pub tamper: Vec<Tamper>,
}

/// A single-bit corruption of a serialized signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Tamper {
    /// Byte `index` of the opened repetition list
    ChallengeC { index: usize },
    /// Byte `index` of the unopened party list
    ChallengeP { index: usize },
    Salt { index: usize },
    /// Flip a bit in the first proof's masked input
    Input { bit: u8 },
    /// Flip a bit in the last proof's unopened commitment
    Commitment { bit: u8 },
    /// Drop the final byte
    Truncate,
}

fn default_state_bits() -> usize {
    128
}

fn default_rounds() -> usize {
    20
}

fn default_sboxes() -> usize {
    10
}

fn default_seed_bytes() -> usize {
    16
}

fn default_salt_bytes() -> usize {
    32
}

fn default_digest_bytes() -> usize {
    32
}

impl Scenario {
    /// Validated parameter set for this scenario
    pub fn params(&self) -> Result<ParameterSet> {
        ParameterSet::custom(
            "scenario",
            self.parties,
            self.repetitions,
            self.opened,
            self.seed_bytes,
            self.salt_bytes,
            self.digest_bytes,
            self.state_bits,
            self.rounds,
            self.sboxes,
        )
        .map_err(|source| ScenarioError::Params {
            name: self.name.clone(),
            source,
        })
    }

    pub fn message_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.message)?)
    }
}
