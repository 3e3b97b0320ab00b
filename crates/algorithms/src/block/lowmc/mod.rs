//! LowMC block cipher
//!
//! Only the instances the signature scheme needs: key size equals block
//! size, and the S-box layer covers the first `3 * num_sboxes` bits of the
//! state. Bit `i` of a state is bit `i` MSB-first of its byte string.
//!
//! The S-box on lanes `(c, b, a) = (s[i], s[i+1], s[i+2])` is
//!
//! ```text
//! a' = a ^ (b & c)
//! b' = a ^ b ^ (a & c)
//! c' = a ^ b ^ c ^ (a & b)
//! ```

use std::sync::Arc;

use picnic_internal::bits::{get_bit, set_bit};
use picnic_internal::constant_time::xor_in_place;
use picnic_params::ParameterSet;
use zeroize::Zeroizing;

use crate::error::{validate, Result};

mod constants;
mod matrix;

pub use constants::LowMcConstants;
pub use matrix::Matrix;

/// A LowMC instance bound to its constant tables
#[derive(Clone, Debug)]
pub struct LowMc {
    state_size_bits: usize,
    num_sboxes: usize,
    constants: Arc<LowMcConstants>,
}

impl LowMc {
    /// Instance for a parameter set
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            state_size_bits: params.state_size_bits,
            num_sboxes: params.num_sboxes,
            constants: LowMcConstants::cached(params.state_size_bits, params.num_rounds),
        }
    }

    /// Constant tables
    pub fn constants(&self) -> &LowMcConstants {
        &self.constants
    }

    /// Block size in bytes
    pub fn block_bytes(&self) -> usize {
        self.state_size_bits / 8
    }

    /// Apply the S-box layer in place
    pub fn sbox_layer(&self, state: &mut [u8]) {
        for i in (0..3 * self.num_sboxes).step_by(3) {
            let a = get_bit(state, i + 2);
            let b = get_bit(state, i + 1);
            let c = get_bit(state, i);

            set_bit(state, i + 2, a ^ (b & c));
            set_bit(state, i + 1, a ^ b ^ (a & c));
            set_bit(state, i, a ^ b ^ c ^ (a & b));
        }
    }

    /// Encrypt one block
    pub fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let n = self.block_bytes();
        validate::length("LowMC key", key.len(), n)?;
        validate::length("LowMC plaintext", plaintext.len(), n)?;

        let c = &self.constants;
        let mut round_key = Zeroizing::new(vec![0u8; n]);
        let mut state = vec![0u8; n];
        let mut tmp = vec![0u8; n];

        c.k_matrix(0).mul_bytes(key, &mut round_key);
        state.copy_from_slice(plaintext);
        xor_in_place(&mut state, &round_key);

        for r in 0..c.rounds() {
            self.sbox_layer(&mut state);
            c.l_matrix(r).mul_bytes(&state, &mut tmp);
            state.copy_from_slice(&tmp);
            xor_in_place(&mut state, c.round_constant(r));
            c.k_matrix(r + 1).mul_bytes(key, &mut round_key);
            xor_in_place(&mut state, &round_key);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests;
