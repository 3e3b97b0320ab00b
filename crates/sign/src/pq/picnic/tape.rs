//! Per-repetition random tapes and broadcast buffers
//!
//! Both are bit matrices with one row per party and a shared column cursor.
//! Reading a column of the tapes yields a party word: bit `p` of the word is
//! party `p`'s bit. Writing a party word to the broadcast buffers appends one
//! bit to every party's message stream.

use picnic_algorithms::{HashPrefix, PicnicHash};
use picnic_internal::bits::{get_bit, num_bytes, set_bit};
use picnic_params::ParameterSet;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::tree::SeedTree;
use crate::error::Result;

/// Random tapes of every party in one repetition
///
/// Layout of a tape: `state_size_bits` key-mask bits, then two bits per AND
/// gate (output mask, helper). The last party's helper bits are overwritten
/// with the auxiliary correction bits during preprocessing.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct RandomTapes {
    tapes: Vec<Vec<u8>>,
    pos: usize,
}

impl RandomTapes {
    /// Derive every party's tape from the leaves of a party seed tree
    ///
    /// A party whose leaf the tree does not hold gets an all-zero tape.
    pub(crate) fn derive(
        params: &ParameterSet,
        seeds: &SeedTree,
        salt: &[u8],
        rep_index: usize,
    ) -> Result<Self> {
        let tape_len = params.tape_size_bytes();
        let mut tapes = Vec::with_capacity(seeds.num_leaves());
        for party in 0..seeds.num_leaves() {
            let mut tape = vec![0u8; tape_len];
            if let Some(seed) = seeds.leaf(party) {
                let mut h = PicnicHash::new(params, HashPrefix::None)?;
                h.update(seed)?;
                h.update(salt)?;
                h.update_u16_le(rep_index as u16)?;
                h.update_u16_le(party as u16)?;
                h.finalize()?;
                h.squeeze(&mut tape)?;
            }
            tapes.push(tape);
        }
        Ok(Self { tapes, pos: 0 })
    }

    /// Read the next column as a party word
    pub(crate) fn next_word(&mut self) -> u64 {
        let mut word = 0u64;
        for (party, tape) in self.tapes.iter().enumerate() {
            word |= (get_bit(tape, self.pos) as u64) << party;
        }
        self.pos += 1;
        word
    }

    /// Read `count` consecutive columns
    pub(crate) fn next_words(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.next_word()).collect()
    }

    /// Overwrite the last party's bit in the most recently read column
    pub(crate) fn set_last_party_previous_bit(&mut self, bit: u8) {
        let pos = self.pos - 1;
        if let Some(last) = self.tapes.last_mut() {
            set_bit(last, pos, bit);
        }
    }

    /// Rewind the cursor to the first column
    pub(crate) fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Pack the last party's auxiliary bits, one per AND gate
    pub(crate) fn aux_bits(&self, params: &ParameterSet) -> Vec<u8> {
        let mut out = vec![0u8; params.and_size_bytes()];
        if let Some(last) = self.tapes.last() {
            let first = params.state_size_bits + 1;
            for k in 0..params.and_size_bits() {
                set_bit(&mut out, k, get_bit(last, first + 2 * k));
            }
        }
        out
    }

    /// Write packed auxiliary bits back into the last party's tape
    ///
    /// Every bit of `aux`, padding included, lands on the tape.
    pub(crate) fn set_aux_bits(&mut self, params: &ParameterSet, aux: &[u8]) {
        let first = params.state_size_bits + 1;
        if let Some(last) = self.tapes.last_mut() {
            for k in 0..aux.len() * 8 {
                set_bit(last, first + 2 * k, get_bit(aux, k));
            }
        }
    }

    /// Erase one party's tape
    pub(crate) fn clear_party(&mut self, party: usize) {
        self.tapes[party].fill(0);
    }
}

/// Broadcast message streams of every party in one repetition
pub(crate) struct Msgs {
    msgs: Vec<Vec<u8>>,
    pos: usize,
    unopened: Option<usize>,
}

impl Msgs {
    pub(crate) fn new(params: &ParameterSet) -> Self {
        Self {
            msgs: vec![vec![0u8; params.msgs_size_bytes()]; params.num_parties as usize],
            pos: 0,
            unopened: None,
        }
    }

    /// Buffers with one party's stream taken from a proof
    ///
    /// That party's bits are never written by the simulation; the recorded
    /// values are read back in their place.
    pub(crate) fn with_unopened(params: &ParameterSet, party: usize, stream: &[u8]) -> Self {
        let mut msgs = Self::new(params);
        msgs.msgs[party].copy_from_slice(stream);
        msgs.unopened = Some(party);
        msgs
    }

    pub(crate) fn unopened(&self) -> Option<usize> {
        self.unopened
    }

    /// The unopened party's recorded bit `offset` columns ahead of the cursor
    pub(crate) fn unopened_bit(&self, offset: usize) -> Option<(usize, u8)> {
        self.unopened
            .map(|party| (party, get_bit(&self.msgs[party], self.pos + offset)))
    }

    /// Append one party word to every stream
    pub(crate) fn push_word(&mut self, word: u64) {
        for (party, msg) in self.msgs.iter_mut().enumerate() {
            set_bit(msg, self.pos, ((word >> party) & 1) as u8);
        }
        self.pos += 1;
    }

    /// Append a word per wire
    pub(crate) fn push_words(&mut self, words: &[u64]) {
        for &w in words {
            self.push_word(w);
        }
    }

    /// Columns written so far
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Written prefix of one party's stream
    pub(crate) fn written(&self, party: usize) -> &[u8] {
        &self.msgs[party][..num_bytes(self.pos)]
    }

    /// One party's full stream buffer
    pub(crate) fn stream(&self, party: usize) -> &[u8] {
        &self.msgs[party]
    }

    pub(crate) fn num_parties(&self) -> usize {
        self.msgs.len()
    }
}
