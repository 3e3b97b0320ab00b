//! Fiat-Shamir challenge
//!
//! The transcript digest is cut into fixed-width chunks, read LSB-first
//! within a chunk. Repetition indices are drawn first, distinct and below
//! `T`; party indices are drawn afterwards from a fresh rehash, below `N`
//! and possibly repeated. The digest is rehashed with tag 1 after every
//! pass, including the one that completes a list.

use picnic_algorithms::{HashPrefix, PicnicHash};
use picnic_internal::bits::get_bit;
use picnic_params::ParameterSet;

use crate::error::Result;

/// Repetitions to open and the party hidden in each
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Challenge {
    pub(crate) repetitions: Vec<u16>,
    pub(crate) parties: Vec<u16>,
}

pub(crate) fn bits_to_chunks(width: usize, input: &[u8]) -> Vec<u16> {
    let count = input.len() * 8 / width;
    (0..count)
        .map(|i| {
            (0..width).fold(0u16, |acc, j| {
                acc + ((get_bit(input, i * width + j) as u16) << j)
            })
        })
        .collect()
}

fn rehash(params: &ParameterSet, h: &mut [u8]) -> Result<()> {
    let next = PicnicHash::digest(params, HashPrefix::One, &[&*h], h.len())?;
    h.copy_from_slice(&next);
    Ok(())
}

/// Derive the challenge from the transcript
#[allow(clippy::too_many_arguments)]
pub(crate) fn hcp(
    params: &ParameterSet,
    ch: &[Vec<u8>],
    cv_root: &[u8],
    salt: &[u8],
    public_output: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> Result<Challenge> {
    let tau = params.num_opened_repetitions as usize;
    let num_reps = params.num_repetitions;
    let num_parties = params.num_parties;

    let mut ctx = PicnicHash::new(params, HashPrefix::None)?;
    for c in ch {
        ctx.update(c)?;
    }
    ctx.update(cv_root)?;
    ctx.update(salt)?;
    ctx.update(public_output)?;
    ctx.update(plaintext)?;
    ctx.update(message)?;
    ctx.finalize()?;
    let mut h = ctx.squeeze_into_vec(params.digest_size_bytes)?;

    let mut repetitions = Vec::with_capacity(tau);
    while repetitions.len() < tau {
        for chunk in bits_to_chunks(params.repetition_chunk_bits(), &h) {
            if chunk < num_reps && !repetitions.contains(&chunk) {
                repetitions.push(chunk);
            }
            if repetitions.len() == tau {
                break;
            }
        }
        rehash(params, &mut h)?;
    }

    let mut parties = Vec::with_capacity(tau);
    while parties.len() < tau {
        for chunk in bits_to_chunks(params.party_chunk_bits(), &h) {
            if chunk < num_parties {
                parties.push(chunk);
            }
            if parties.len() == tau {
                break;
            }
        }
        rehash(params, &mut h)?;
    }

    Ok(Challenge {
        repetitions,
        parties,
    })
}

/// Repetitions outside the challenge, ascending
pub(crate) fn missing_leaves(params: &ParameterSet, repetitions: &[u16]) -> Vec<u16> {
    (0..params.num_repetitions)
        .filter(|t| !repetitions.contains(t))
        .collect()
}

