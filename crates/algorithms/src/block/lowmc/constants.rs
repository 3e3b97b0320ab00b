//! LowMC constant tables
//!
//! Linear layers, round constants and key matrices are drawn from the
//! Grain-based self-shrinking generator LowMC instances are specified with,
//! in that order. Matrices are resampled until they have full rank.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use picnic_internal::bits::{num_bytes, set_bit};

use super::matrix::Matrix;

/// 80-bit LFSR filtered by self-shrinking
struct GrainSsg {
    state: [u8; 80],
    index: usize,
}

impl GrainSsg {
    fn new() -> Self {
        let mut g = Self {
            state: [1; 80],
            index: 0,
        };
        for _ in 0..160 {
            g.clock();
        }
        g
    }

    fn clock(&mut self) -> u8 {
        let i = self.index;
        let s = &mut self.state;
        let bit = s[i] ^ s[(i + 13) % 80] ^ s[(i + 23) % 80] ^ s[(i + 38) % 80] ^ s[(i + 51) % 80]
            ^ s[(i + 62) % 80];
        s[i] = bit;
        self.index = (i + 1) % 80;
        bit
    }

    fn next_bit(&mut self) -> u8 {
        loop {
            let choice = self.clock();
            let bit = self.clock();
            if choice == 1 {
                return bit;
            }
        }
    }

    fn matrix(&mut self, rows: usize, cols: usize) -> Matrix {
        let mut m = Matrix::zero(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.set(i, j, self.next_bit());
            }
        }
        m
    }

    fn full_rank_matrix(&mut self, rows: usize, cols: usize) -> Matrix {
        loop {
            let m = self.matrix(rows, cols);
            if m.rank() == rows.min(cols) {
                return m;
            }
        }
    }

    fn vector(&mut self, bits: usize) -> Vec<u8> {
        let mut v = vec![0u8; num_bytes(bits)];
        for i in 0..bits {
            set_bit(&mut v, i, self.next_bit());
        }
        v
    }
}

/// Constant tables for one (block size, rounds) shape
#[derive(Debug, PartialEq, Eq)]
pub struct LowMcConstants {
    state_size_bits: usize,
    linear: Vec<Matrix>,
    round_constants: Vec<Vec<u8>>,
    key_matrices: Vec<Matrix>,
}

static CACHE: Lazy<Mutex<HashMap<(usize, usize), Arc<LowMcConstants>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

impl LowMcConstants {
    /// Generate tables for `rounds` rounds of a `state_size_bits` block with
    /// an equally sized key
    pub fn generate(state_size_bits: usize, rounds: usize) -> Self {
        let n = state_size_bits;
        let mut grain = GrainSsg::new();
        let linear = (0..rounds).map(|_| grain.full_rank_matrix(n, n)).collect();
        let round_constants = (0..rounds).map(|_| grain.vector(n)).collect();
        let key_matrices = (0..=rounds).map(|_| grain.full_rank_matrix(n, n)).collect();
        Self {
            state_size_bits,
            linear,
            round_constants,
            key_matrices,
        }
    }

    /// Shared tables for a shape, generated on first use
    pub fn cached(state_size_bits: usize, rounds: usize) -> Arc<Self> {
        let mut cache = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .entry((state_size_bits, rounds))
            .or_insert_with(|| Arc::new(Self::generate(state_size_bits, rounds)))
            .clone()
    }

    /// Block size in bits
    pub fn state_size_bits(&self) -> usize {
        self.state_size_bits
    }

    /// Number of rounds
    pub fn rounds(&self) -> usize {
        self.linear.len()
    }

    /// Linear layer of round `round` (0-based)
    pub fn l_matrix(&self, round: usize) -> &Matrix {
        &self.linear[round]
    }

    /// Key matrix `round`; matrix 0 whitens the input
    pub fn k_matrix(&self, round: usize) -> &Matrix {
        &self.key_matrices[round]
    }

    /// Round constant of round `round` (0-based)
    pub fn round_constant(&self, round: usize) -> &[u8] {
        &self.round_constants[round]
    }
}
