//! Parameter sets for the Picnic2 signature scheme
//!
//! The three presets are the round-2 Picnic2 Fiat-Shamir instances at NIST
//! levels 1, 3 and 5. Each pairs a LowMC instance (block size = key size =
//! `state_size_bits`) with the MPC-in-the-head proof dimensions: `N` parties
//! per repetition, `T` repetitions of which `tau` are opened.

use picnic_internal::bits::{ceil_log2, num_bytes};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest party count: one bit per party in a 64-bit word
pub const MAX_PARTIES: u16 = 64;

/// Largest repetition count whose tree node indices fit a u16
///
/// A tree over T leaves has up to 2T - 1 nodes and node indices are hashed
/// as two little-endian bytes.
pub const MAX_REPETITIONS: u16 = 1 << 15;

/// Inconsistent parameter set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter set {name}: {reason}")]
pub struct ConfigError {
    /// Name of the rejected parameter set
    pub name: &'static str,
    /// Which constraint failed
    pub reason: &'static str,
}

/// SHAKE instance backing the sponge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HashVariant {
    /// SHAKE128, used for 128-bit states
    Shake128,
    /// SHAKE256, used for everything larger
    Shake256,
}

/// One instance of the scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterSet {
    /// Human readable name
    pub name: &'static str,
    /// Identifier byte prefixed to serialized keys
    pub id: u8,
    /// Virtual MPC parties per repetition (N)
    pub num_parties: u16,
    /// Parallel repetitions (T)
    pub num_repetitions: u16,
    /// Repetitions opened by the challenge (tau)
    pub num_opened_repetitions: u16,
    /// Seed length in bytes
    pub seed_size_bytes: usize,
    /// Salt length in bytes
    pub salt_size_bytes: usize,
    /// Digest length in bytes
    pub digest_size_bytes: usize,
    /// LowMC block and key size in bits
    pub state_size_bits: usize,
    /// LowMC round count
    pub num_rounds: usize,
    /// S-boxes per LowMC round
    pub num_sboxes: usize,
}

/// Picnic2-L1-FS
pub const PICNIC2_L1_FS: ParameterSet = ParameterSet {
    name: "Picnic2-L1-FS",
    id: 7,
    num_parties: 64,
    num_repetitions: 343,
    num_opened_repetitions: 27,
    seed_size_bytes: 16,
    salt_size_bytes: 32,
    digest_size_bytes: 32,
    state_size_bits: 128,
    num_rounds: 20,
    num_sboxes: 10,
};

/// Picnic2-L3-FS
pub const PICNIC2_L3_FS: ParameterSet = ParameterSet {
    name: "Picnic2-L3-FS",
    id: 8,
    num_parties: 64,
    num_repetitions: 570,
    num_opened_repetitions: 39,
    seed_size_bytes: 24,
    salt_size_bytes: 32,
    digest_size_bytes: 48,
    state_size_bits: 192,
    num_rounds: 30,
    num_sboxes: 10,
};

/// Picnic2-L5-FS
pub const PICNIC2_L5_FS: ParameterSet = ParameterSet {
    name: "Picnic2-L5-FS",
    id: 9,
    num_parties: 64,
    num_repetitions: 803,
    num_opened_repetitions: 51,
    seed_size_bytes: 32,
    salt_size_bytes: 32,
    digest_size_bytes: 64,
    state_size_bits: 256,
    num_rounds: 38,
    num_sboxes: 10,
};

impl ParameterSet {
    /// Preset carrying wire id `id`
    pub fn from_id(id: u8) -> Option<Self> {
        [PICNIC2_L1_FS, PICNIC2_L3_FS, PICNIC2_L5_FS]
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Build and validate a custom parameter set
    ///
    /// Custom sets carry wire id 0.
    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        name: &'static str,
        num_parties: u16,
        num_repetitions: u16,
        num_opened_repetitions: u16,
        seed_size_bytes: usize,
        salt_size_bytes: usize,
        digest_size_bytes: usize,
        state_size_bits: usize,
        num_rounds: usize,
        num_sboxes: usize,
    ) -> Result<Self, ConfigError> {
        let params = Self {
            name,
            id: 0,
            num_parties,
            num_repetitions,
            num_opened_repetitions,
            seed_size_bytes,
            salt_size_bytes,
            digest_size_bytes,
            state_size_bits,
            num_rounds,
            num_sboxes,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every structural constraint the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason| {
            Err(ConfigError {
                name: self.name,
                reason,
            })
        };
        if self.num_opened_repetitions == 0 {
            return fail("at least one repetition must be opened");
        }
        if self.num_opened_repetitions >= self.num_repetitions {
            return fail("opened repetitions must be fewer than repetitions");
        }
        if self.num_repetitions > MAX_REPETITIONS {
            return fail("too many repetitions for 16-bit tree node indices");
        }
        if self.num_parties < 2 || self.num_parties > MAX_PARTIES {
            return fail("party count must be in 2..=64");
        }
        if self.state_size_bits == 0 || self.state_size_bits % 8 != 0 {
            return fail("state size must be a positive multiple of 8 bits");
        }
        if self.num_rounds == 0 {
            return fail("at least one round is required");
        }
        if self.num_sboxes == 0 || 3 * self.num_sboxes > self.state_size_bits {
            return fail("s-box layer must fit in the state");
        }
        if self.seed_size_bytes == 0 || self.salt_size_bytes == 0 || self.digest_size_bytes == 0 {
            return fail("seed, salt and digest sizes must be non-zero");
        }
        if self.digest_size_bytes * 8 < self.repetition_chunk_bits().max(self.party_chunk_bits()) {
            return fail("digest too short to derive a challenge");
        }
        Ok(())
    }

    /// LowMC state size in bytes
    pub const fn state_size_bytes(&self) -> usize {
        num_bytes(self.state_size_bits)
    }

    /// LowMC state size in 64-bit words
    pub const fn state_size_words(&self) -> usize {
        (self.state_size_bits + 63) / 64
    }

    /// AND gates evaluated by one LowMC encryption
    pub const fn and_size_bits(&self) -> usize {
        3 * self.num_rounds * self.num_sboxes
    }

    /// Bytes holding one bit per AND gate
    pub const fn and_size_bytes(&self) -> usize {
        num_bytes(self.and_size_bits())
    }

    /// Random tape length per party: key masks, then two bits per AND gate
    pub const fn tape_size_bytes(&self) -> usize {
        2 * self.and_size_bytes() + self.state_size_bytes()
    }

    /// Broadcast message buffer per party
    pub const fn msgs_size_bytes(&self) -> usize {
        self.state_size_bytes() + self.and_size_bytes()
    }

    /// Bits actually written to a party's broadcast buffer
    pub const fn msgs_size_bits(&self) -> usize {
        self.state_size_bits + self.and_size_bits()
    }

    /// Index of the party that holds the auxiliary bits
    pub const fn last_party(&self) -> u16 {
        self.num_parties - 1
    }

    /// Width of a challenge chunk selecting a repetition
    pub const fn repetition_chunk_bits(&self) -> usize {
        ceil_log2(self.num_repetitions as usize)
    }

    /// Width of a challenge chunk selecting a party
    pub const fn party_chunk_bits(&self) -> usize {
        ceil_log2(self.num_parties as usize)
    }

    /// SHAKE instance for this state size
    pub const fn hash_variant(&self) -> HashVariant {
        match self.state_size_bits {
            128 | 129 => HashVariant::Shake128,
            _ => HashVariant::Shake256,
        }
    }

    /// Serialized public key length: id, ciphertext, plaintext
    pub const fn public_key_bytes(&self) -> usize {
        1 + 2 * self.state_size_bytes()
    }

    /// Serialized secret key length: id, key, ciphertext, plaintext
    pub const fn secret_key_bytes(&self) -> usize {
        1 + 3 * self.state_size_bytes()
    }
}

/// Type-level binding of a preset, used by the generic scheme type
pub trait PicnicSchemeParams: Send + Sync + 'static {
    /// Algorithm name
    const NAME: &'static str;
    /// The preset
    const PARAMS: ParameterSet;
}

/// Picnic2 at NIST level 1
pub struct Picnic2L1FsParams;

/// Picnic2 at NIST level 3
pub struct Picnic2L3FsParams;

/// Picnic2 at NIST level 5
pub struct Picnic2L5FsParams;

impl PicnicSchemeParams for Picnic2L1FsParams {
    const NAME: &'static str = PICNIC2_L1_FS.name;
    const PARAMS: ParameterSet = PICNIC2_L1_FS;
}

impl PicnicSchemeParams for Picnic2L3FsParams {
    const NAME: &'static str = PICNIC2_L3_FS.name;
    const PARAMS: ParameterSet = PICNIC2_L3_FS;
}

impl PicnicSchemeParams for Picnic2L5FsParams {
    const NAME: &'static str = PICNIC2_L5_FS.name;
    const PARAMS: ParameterSet = PICNIC2_L5_FS;
}
