//! Extendable Output Functions (XOF)
//!
//! SHAKE128 and SHAKE256 behind the [`ExtendableOutputFunction`] trait, and
//! [`PicnicHash`], the domain-separated sponge the signature engine hashes
//! everything with.

use picnic_params::{HashVariant, ParameterSet};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake128Reader, Shake256, Shake256Reader};

use crate::error::{validate, Result};

/// Trait for extendable output functions
pub trait ExtendableOutputFunction {
    /// Creates a new instance of the XOF
    fn new() -> Self;

    /// Updates the XOF state with new data
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finalizes the XOF state for output
    fn finalize(&mut self) -> Result<()>;

    /// Squeezes output bytes into the provided buffer
    fn squeeze(&mut self, output: &mut [u8]) -> Result<()>;

    /// Squeezes the specified number of output bytes into a new vector
    fn squeeze_into_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.squeeze(&mut out)?;
        Ok(out)
    }
}

enum SpongeState<H, R> {
    Absorbing(H),
    Squeezing(R),
    Spent,
}

macro_rules! shake_xof {
    ($name:ident, $hasher:ty, $reader:ty, $doc:literal) => {
        #[doc = $doc]
        pub struct $name {
            state: SpongeState<$hasher, $reader>,
        }

        impl ExtendableOutputFunction for $name {
            fn new() -> Self {
                Self {
                    state: SpongeState::Absorbing(<$hasher>::default()),
                }
            }

            fn update(&mut self, data: &[u8]) -> Result<()> {
                match &mut self.state {
                    SpongeState::Absorbing(h) => {
                        h.update(data);
                        Ok(())
                    }
                    _ => validate::state(false, "update", "sponge already finalized"),
                }
            }

            fn finalize(&mut self) -> Result<()> {
                match core::mem::replace(&mut self.state, SpongeState::Spent) {
                    SpongeState::Absorbing(h) => {
                        self.state = SpongeState::Squeezing(h.finalize_xof());
                        Ok(())
                    }
                    other => {
                        self.state = other;
                        validate::state(false, "finalize", "sponge already finalized")
                    }
                }
            }

            fn squeeze(&mut self, output: &mut [u8]) -> Result<()> {
                match &mut self.state {
                    SpongeState::Squeezing(r) => {
                        r.read(output);
                        Ok(())
                    }
                    _ => validate::state(false, "squeeze", "sponge not finalized"),
                }
            }
        }
    };
}

shake_xof!(ShakeXof128, Shake128, Shake128Reader, "SHAKE-128 extendable output function");
shake_xof!(ShakeXof256, Shake256, Shake256Reader, "SHAKE-256 extendable output function");

/// Domain-separation tag absorbed before any input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPrefix {
    /// No tag byte
    None,
    /// Tag 1: seed-tree expansion and challenge rehash
    One,
    /// Tag 3: Merkle interior nodes
    Three,
}

impl HashPrefix {
    /// Byte absorbed for this tag
    pub const fn as_byte(self) -> Option<u8> {
        match self {
            HashPrefix::None => None,
            HashPrefix::One => Some(1),
            HashPrefix::Three => Some(3),
        }
    }
}

enum Sponge {
    Shake128(ShakeXof128),
    Shake256(ShakeXof256),
}

/// The sponge used throughout the signature engine
///
/// SHAKE128 for 128-bit states, SHAKE256 otherwise. A prefixed sponge
/// absorbs the tag byte first.
pub struct PicnicHash {
    sponge: Sponge,
}

impl PicnicHash {
    /// Start a sponge for `params` with the given domain tag
    pub fn new(params: &ParameterSet, prefix: HashPrefix) -> Result<Self> {
        let sponge = match params.hash_variant() {
            HashVariant::Shake128 => Sponge::Shake128(ShakeXof128::new()),
            HashVariant::Shake256 => Sponge::Shake256(ShakeXof256::new()),
        };
        let mut hash = Self { sponge };
        if let Some(tag) = prefix.as_byte() {
            hash.update(&[tag])?;
        }
        Ok(hash)
    }

    /// Absorb bytes
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.sponge {
            Sponge::Shake128(x) => x.update(data),
            Sponge::Shake256(x) => x.update(data),
        }
    }

    /// Absorb a u16 as two little-endian bytes
    pub fn update_u16_le(&mut self, value: u16) -> Result<()> {
        self.update(&value.to_le_bytes())
    }

    /// Switch to squeezing
    pub fn finalize(&mut self) -> Result<()> {
        match &mut self.sponge {
            Sponge::Shake128(x) => x.finalize(),
            Sponge::Shake256(x) => x.finalize(),
        }
    }

    /// Fill `out` with output bytes
    pub fn squeeze(&mut self, out: &mut [u8]) -> Result<()> {
        match &mut self.sponge {
            Sponge::Shake128(x) => x.squeeze(out),
            Sponge::Shake256(x) => x.squeeze(out),
        }
    }

    /// Squeeze `len` bytes into a new vector
    pub fn squeeze_into_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.squeeze(&mut out)?;
        Ok(out)
    }

    /// One-shot hash of the concatenation of `parts`
    pub fn digest(
        params: &ParameterSet,
        prefix: HashPrefix,
        parts: &[&[u8]],
        len: usize,
    ) -> Result<Vec<u8>> {
        validate::parameter(len > 0, "output_length", "digest length must be greater than 0")?;
        let mut hash = Self::new(params, prefix)?;
        for part in parts {
            hash.update(part)?;
        }
        hash.finalize()?;
        hash.squeeze_into_vec(len)
    }
}
