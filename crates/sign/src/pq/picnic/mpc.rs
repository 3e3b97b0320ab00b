//! LowMC evaluated under bit-sliced secret sharing
//!
//! Every wire of the cipher state carries a mask word: bit `p` is party
//! `p`'s share of the wire's mask, and the mask itself is the parity of the
//! word. Linear layers act on mask words by XOR, so only the AND gates of
//! the S-box layer consume tape randomness.
//!
//! Two passes share the same round structure:
//!
//! - preprocessing ([`compute_aux_tape`]) runs on masks alone and fixes the
//!   last party's helper bits so that for every AND gate
//!   `parity(helper) == parity(mask_a) & parity(mask_b)`;
//! - the online pass ([`simulate_online`]) runs on the masked key, writes
//!   each party's share of every AND output to the broadcast streams and
//!   finally checks the unmasked output against the public cipher output.

use picnic_algorithms::LowMc;
use picnic_internal::bits::{get_bit, num_bytes, parity64, set_bit};
use picnic_internal::constant_time::{ct_eq, xor_in_place};
use picnic_params::ParameterSet;

use super::tape::{Msgs, RandomTapes};
use crate::error::{Error, Result};

/// All-ones word for 1, zero for 0
#[inline]
fn extend(bit: u8) -> u64 {
    0u64.wrapping_sub((bit & 1) as u64)
}

#[inline]
fn with_party_bit(word: u64, party: usize, bit: u8) -> u64 {
    (word & !(1u64 << party)) | (((bit & 1) as u64) << party)
}

/// Unmask a share vector: bit `i` of the output is the parity of word `i`
pub(crate) fn reconstruct(masks: &[u64]) -> Vec<u8> {
    let mut out = vec![0u8; num_bytes(masks.len())];
    for (i, &m) in masks.iter().enumerate() {
        set_bit(&mut out, i, parity64(m));
    }
    out
}

fn aux_and(a: u64, b: u64, tapes: &mut RandomTapes, last: usize) -> u64 {
    let mask_a = parity64(a);
    let mask_b = parity64(b);
    let fresh_output_mask = tapes.next_word();
    let helper = tapes.next_word() & !(1u64 << last);

    let aux = (mask_a & mask_b) ^ parity64(helper);
    tapes.set_last_party_previous_bit(aux);
    fresh_output_mask
}

fn aux_sbox(params: &ParameterSet, state: &mut [u64], tapes: &mut RandomTapes) {
    let last = params.last_party() as usize;
    for i in (0..3 * params.num_sboxes).step_by(3) {
        let a = state[i + 2];
        let b = state[i + 1];
        let c = state[i];

        let ab = aux_and(a, b, tapes, last);
        let bc = aux_and(b, c, tapes, last);
        let ca = aux_and(c, a, tapes, last);

        state[i + 2] = a ^ bc;
        state[i + 1] = a ^ b ^ ca;
        state[i] = a ^ b ^ c ^ ab;
    }
}

/// Preprocessing: write the auxiliary bits into the last party's tape
///
/// Leaves the tape cursor rewound so the online pass reads the same bits.
pub(crate) fn compute_aux_tape(params: &ParameterSet, lowmc: &LowMc, tapes: &mut RandomTapes) {
    let c = lowmc.constants();
    let n = params.state_size_bits;

    let key = tapes.next_words(n);
    let mut state = vec![0u64; n];
    let mut round_key = vec![0u64; n];
    let mut tmp = vec![0u64; n];

    // Round constants and the plaintext are public, so the initial masks
    // are those of the first round key.
    c.k_matrix(0).mul_words(&key, &mut state);

    for r in 1..=params.num_rounds {
        c.k_matrix(r).mul_words(&key, &mut round_key);
        aux_sbox(params, &mut state, tapes);
        c.l_matrix(r - 1).mul_words(&state, &mut tmp);
        core::mem::swap(&mut state, &mut tmp);
        state.iter_mut().zip(&round_key).for_each(|(s, k)| *s ^= k);
    }

    tapes.rewind();
}

fn mpc_and(
    (a, mask_a): (u8, u64),
    (b, mask_b): (u8, u64),
    tapes: &mut RandomTapes,
    msgs: &mut Msgs,
) -> (u8, u64) {
    let output_mask = tapes.next_word();
    let and_helper = tapes.next_word();
    let mut s_shares = (extend(a) & mask_b) ^ (extend(b) & mask_a) ^ and_helper ^ output_mask;

    if let Some((party, bit)) = msgs.unopened_bit(0) {
        s_shares = with_party_bit(s_shares, party, bit);
    }
    msgs.push_word(s_shares);

    (parity64(s_shares) ^ (a & b), output_mask)
}

fn mpc_sbox(
    params: &ParameterSet,
    state: &mut [u8],
    masks: &mut [u64],
    tapes: &mut RandomTapes,
    msgs: &mut Msgs,
) {
    for i in (0..3 * params.num_sboxes).step_by(3) {
        let a = (get_bit(state, i + 2), masks[i + 2]);
        let b = (get_bit(state, i + 1), masks[i + 1]);
        let c = (get_bit(state, i), masks[i]);

        let (ab, ab_mask) = mpc_and(a, b, tapes, msgs);
        let (bc, bc_mask) = mpc_and(b, c, tapes, msgs);
        let (ca, ca_mask) = mpc_and(c, a, tapes, msgs);

        set_bit(state, i + 2, a.0 ^ bc);
        masks[i + 2] = a.1 ^ bc_mask;
        set_bit(state, i + 1, a.0 ^ b.0 ^ ca);
        masks[i + 1] = b.1 ^ a.1 ^ ca_mask;
        set_bit(state, i, a.0 ^ b.0 ^ c.0 ^ ab);
        masks[i] = a.1 ^ b.1 ^ c.1 ^ ab_mask;
    }
}

/// Online pass over one repetition
///
/// `masks` are the key-mask words read from the tapes; `masked_key` is the
/// key XOR their parity. On success the broadcast streams end with every
/// party's share of the output masks.
#[allow(clippy::too_many_arguments)]
pub(crate) fn simulate_online(
    params: &ParameterSet,
    lowmc: &LowMc,
    rep_index: usize,
    masked_key: &[u8],
    mut masks: Vec<u64>,
    tapes: &mut RandomTapes,
    msgs: &mut Msgs,
    plaintext: &[u8],
    public_output: &[u8],
) -> Result<()> {
    let c = lowmc.constants();
    let n = params.state_size_bits;
    let n_bytes = params.state_size_bytes();

    let key_masks = masks.clone();
    let mut round_key_masks = vec![0u64; n];
    let mut tmp_masks = vec![0u64; n];
    let mut round_key = vec![0u8; n_bytes];
    let mut state = vec![0u8; n_bytes];
    let mut tmp = vec![0u8; n_bytes];

    c.k_matrix(0).mul_bytes(masked_key, &mut round_key);
    c.k_matrix(0).mul_words(&key_masks, &mut masks);
    state.copy_from_slice(&round_key);
    xor_in_place(&mut state, plaintext);

    for r in 1..=params.num_rounds {
        let k = c.k_matrix(r);
        k.mul_bytes(masked_key, &mut round_key);
        k.mul_words(&key_masks, &mut round_key_masks);

        mpc_sbox(params, &mut state, &mut masks, tapes, msgs);

        let l = c.l_matrix(r - 1);
        l.mul_bytes(&state, &mut tmp);
        l.mul_words(&masks, &mut tmp_masks);
        core::mem::swap(&mut state, &mut tmp);
        core::mem::swap(&mut masks, &mut tmp_masks);

        xor_in_place(&mut state, c.round_constant(r - 1));
        xor_in_place(&mut state, &round_key);
        masks
            .iter_mut()
            .zip(&round_key_masks)
            .for_each(|(m, k)| *m ^= k);
    }

    // The unopened party's output shares come from its recorded stream.
    if msgs.unopened().is_some() {
        for (i, m) in masks.iter_mut().enumerate() {
            if let Some((party, bit)) = msgs.unopened_bit(i) {
                *m = with_party_bit(*m, party, bit);
            }
        }
    }

    let mut output = reconstruct(&masks);
    xor_in_place(&mut output, &state);
    if !ct_eq(&output[..], public_output) {
        return Err(Error::ProtocolInconsistency {
            repetition: rep_index,
        });
    }

    msgs.push_words(&masks);
    Ok(())
}
