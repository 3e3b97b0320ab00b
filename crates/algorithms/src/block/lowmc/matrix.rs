//! Dense matrices over GF(2)
//!
//! Column `j` of a row is bit `j` of the MSB-first byte encoding used for
//! cipher states, so a row's bytes read as big-endian u64 words line up with
//! a state read the same way.

/// A `rows x cols` bit matrix stored as big-endian 64-bit row words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    words_per_row: usize,
    data: Vec<u64>,
}

/// Pack MSB-first bytes into big-endian words, zero padded
pub(crate) fn bytes_to_words(bytes: &[u8], words: usize) -> Vec<u64> {
    let mut out = vec![0u64; words];
    for (i, b) in bytes.iter().enumerate() {
        out[i / 8] |= (*b as u64) << (56 - 8 * (i % 8));
    }
    out
}

impl Matrix {
    /// All-zero matrix
    pub fn zero(rows: usize, cols: usize) -> Self {
        let words_per_row = (cols + 63) / 64;
        Self {
            rows,
            cols,
            words_per_row,
            data: vec![0u64; rows * words_per_row],
        }
    }

    /// Identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zero(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn row(&self, i: usize) -> &[u64] {
        &self.data[i * self.words_per_row..(i + 1) * self.words_per_row]
    }

    /// Entry `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> u8 {
        ((self.row(i)[j / 64] >> (63 - j % 64)) & 1) as u8
    }

    /// Set entry `(i, j)`
    pub fn set(&mut self, i: usize, j: usize, bit: u8) {
        let word = &mut self.data[i * self.words_per_row + j / 64];
        let mask = 1u64 << (63 - j % 64);
        if bit & 1 == 1 {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// `out = M * v` with `v` and `out` as MSB-first bit strings
    pub fn mul_bytes(&self, v: &[u8], out: &mut [u8]) {
        let v = bytes_to_words(v, self.words_per_row);
        out.iter_mut().for_each(|b| *b = 0);
        for i in 0..self.rows {
            let bit = self
                .row(i)
                .iter()
                .zip(&v)
                .fold(0u32, |acc, (r, x)| acc ^ (r & x).count_ones())
                & 1;
            out[i / 8] |= (bit as u8) << (7 - i % 8);
        }
    }

    /// Push a share vector through the matrix
    ///
    /// `masks[j]` holds wire `j` bit-sliced across parties; `out[i]` becomes
    /// the XOR of every `masks[j]` with `M[i][j] = 1`.
    pub fn mul_words(&self, masks: &[u64], out: &mut [u64]) {
        for (i, o) in out.iter_mut().enumerate().take(self.rows) {
            let mut acc = 0u64;
            for (w, &row_word) in self.row(i).iter().enumerate() {
                let mut bits = row_word;
                while bits != 0 {
                    let lead = bits.leading_zeros() as usize;
                    acc ^= masks[w * 64 + lead];
                    bits &= !(1u64 << (63 - lead));
                }
            }
            *o = acc;
        }
    }

    /// Rank over GF(2)
    pub fn rank(&self) -> usize {
        let mut rows: Vec<Vec<u64>> = (0..self.rows).map(|i| self.row(i).to_vec()).collect();
        let mut rank = 0;
        for col in 0..self.cols {
            let (w, mask) = (col / 64, 1u64 << (63 - col % 64));
            let Some(pivot) = (rank..rows.len()).find(|&r| rows[r][w] & mask != 0) else {
                continue;
            };
            rows.swap(rank, pivot);
            let pivot_row = rows[rank].clone();
            for (r, row) in rows.iter_mut().enumerate() {
                if r != rank && row[w] & mask != 0 {
                    row.iter_mut().zip(&pivot_row).for_each(|(a, b)| *a ^= b);
                }
            }
            rank += 1;
            if rank == rows.len() {
                break;
            }
        }
        rank
    }
}
