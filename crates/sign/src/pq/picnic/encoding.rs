//! Signature structure and wire format
//!
//! ```text
//! C          tau x u16 LE
//! P          tau x u16 LE
//! salt       salt_size_bytes
//! iSeedInfo  reveal of the repetition seed tree hiding C
//! cvInfo     Merkle opening for the repetitions outside C
//! proofs     one per opened repetition, ascending repetition index:
//!   seedInfo   reveal of the party seed tree hiding the unopened party
//!   aux        and_size_bytes, only when the unopened party is not the last
//!   input      state_size_bytes
//!   msgs       state_size_bytes + and_size_bytes
//!   C          digest_size_bytes
//! ```
//!
//! Every variable-length field has a length that follows from the parameter
//! set and the challenge, so the exact total is known once the two index
//! lists are read.

use picnic_internal::bits::{ceil_log2, padding_is_zero};
use picnic_internal::endian::{u16_from_le_bytes, u16_to_le_bytes};
use picnic_params::ParameterSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::challenge::missing_leaves;
use super::merkle::open_size;
use super::tree::reveal_size;
use crate::error::{Error, Result};

/// Proof for one opened repetition
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Proof {
    /// Party seed-tree reveal hiding the unopened party
    pub seed_info: Vec<u8>,
    /// Auxiliary bits, present unless the last party is the unopened one
    pub aux: Option<Vec<u8>>,
    /// Masked key
    pub input: Vec<u8>,
    /// Unopened party's broadcast stream
    pub msgs: Vec<u8>,
    /// Unopened party's seed commitment
    pub commitment: Vec<u8>,
}

/// A Picnic2 signature
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signature {
    /// Opened repetitions, in challenge order
    pub challenge_c: Vec<u16>,
    /// Unopened party of each opened repetition, parallel to `challenge_c`
    pub challenge_p: Vec<u16>,
    /// Per-signature salt
    pub salt: Vec<u8>,
    /// Repetition seed-tree reveal
    pub iseed_info: Vec<u8>,
    /// Merkle opening for the view commitments
    pub cv_info: Vec<u8>,
    /// One proof per opened repetition, ascending repetition index
    pub proofs: Vec<Proof>,
}

impl Signature {
    /// Proof for repetition `t`, if it was opened
    pub fn proof(&self, t: u16) -> Option<&Proof> {
        if !self.challenge_c.contains(&t) {
            return None;
        }
        let index = self.challenge_c.iter().filter(|&&c| c < t).count();
        self.proofs.get(index)
    }

    /// Unopened party of repetition `t`, if it was opened
    pub fn unopened_party(&self, t: u16) -> Option<u16> {
        let index = self.challenge_c.iter().position(|&c| c == t)?;
        self.challenge_p.get(index).copied()
    }
}

/// Cursor over signature bytes
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Reads exactly `len` bytes from the cursor.
    pub(crate) fn read_exact(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::malformed(format!("truncated at {}", field)));
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    pub(crate) fn read_vec(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>> {
        Ok(self.read_exact(len, field)?.to_vec())
    }

    pub(crate) fn read_u16_le(&mut self, field: &'static str) -> Result<u16> {
        let bytes = self.read_exact(2, field)?;
        u16_from_le_bytes(bytes).ok_or_else(|| Error::malformed(field))
    }
}

/// Check the index lists: lengths, ranges and distinct repetitions
pub(crate) fn check_challenge(params: &ParameterSet, c: &[u16], p: &[u16]) -> Result<()> {
    let tau = params.num_opened_repetitions as usize;
    if c.len() != tau || p.len() != tau {
        return Err(Error::malformed("challenge lists have the wrong length"));
    }
    if c.iter().any(|&t| t >= params.num_repetitions) {
        return Err(Error::malformed("repetition index out of range"));
    }
    if c.iter().enumerate().any(|(i, t)| c[..i].contains(t)) {
        return Err(Error::malformed("repeated repetition index"));
    }
    if p.iter().any(|&j| j >= params.num_parties) {
        return Err(Error::malformed("party index out of range"));
    }
    Ok(())
}

/// Opened repetitions in ascending order, paired with their unopened party
pub(crate) fn opened_in_order(c: &[u16], p: &[u16]) -> Vec<(u16, u16)> {
    let mut pairs: Vec<(u16, u16)> = c.iter().copied().zip(p.iter().copied()).collect();
    pairs.sort_unstable_by_key(|&(t, _)| t);
    pairs
}

fn proof_len(params: &ParameterSet, unopened: u16) -> usize {
    let mut len = reveal_size(params.num_parties as usize, &[unopened], params.seed_size_bytes);
    if unopened != params.last_party() {
        len += params.and_size_bytes();
    }
    len + params.state_size_bytes() + params.msgs_size_bytes() + params.digest_size_bytes
}

/// Exact serialized length for a signature carrying challenge `(c, p)`
///
/// The lists must already satisfy the range and uniqueness rules.
pub fn signature_len(params: &ParameterSet, c: &[u16], p: &[u16]) -> usize {
    let tau = params.num_opened_repetitions as usize;
    let num_reps = params.num_repetitions as usize;

    let mut len = 4 * tau + params.salt_size_bytes;
    len += reveal_size(num_reps, c, params.seed_size_bytes);
    len += open_size(num_reps, &missing_leaves(params, c), params.digest_size_bytes);
    len + p.iter().map(|&j| proof_len(params, j)).sum::<usize>()
}

/// Upper bound on the serialized length of any signature
///
/// A reveal hiding `k` leaves publishes at most one node per level of each
/// hidden path; a Merkle opening at most one node per missing leaf.
pub const fn max_signature_len(params: &ParameterSet) -> usize {
    let tau = params.num_opened_repetitions as usize;
    let num_reps = params.num_repetitions as usize;
    let rep_levels = ceil_log2(num_reps);
    let party_levels = ceil_log2(params.num_parties as usize);

    let merkle_nodes = if num_reps - tau < tau * rep_levels {
        num_reps - tau
    } else {
        tau * rep_levels
    };
    let proof = party_levels * params.seed_size_bytes
        + params.and_size_bytes()
        + params.state_size_bytes()
        + params.msgs_size_bytes()
        + params.digest_size_bytes;

    4 * tau
        + params.salt_size_bytes
        + tau * rep_levels * params.seed_size_bytes
        + merkle_nodes * params.digest_size_bytes
        + tau * proof
}

/// Check every field of an in-memory signature against the parameter set
pub(crate) fn check_signature(params: &ParameterSet, sig: &Signature) -> Result<()> {
    check_challenge(params, &sig.challenge_c, &sig.challenge_p)?;

    let num_reps = params.num_repetitions as usize;
    let field = |ok: bool, what: &'static str| {
        if ok {
            Ok(())
        } else {
            Err(Error::malformed(what))
        }
    };
    field(sig.salt.len() == params.salt_size_bytes, "salt length")?;
    field(
        sig.iseed_info.len() == reveal_size(num_reps, &sig.challenge_c, params.seed_size_bytes),
        "iSeedInfo length",
    )?;
    field(
        sig.cv_info.len()
            == open_size(
                num_reps,
                &missing_leaves(params, &sig.challenge_c),
                params.digest_size_bytes,
            ),
        "cvInfo length",
    )?;
    field(sig.proofs.len() == sig.challenge_c.len(), "proof count")?;

    let opened = opened_in_order(&sig.challenge_c, &sig.challenge_p);
    for (proof, &(_, unopened)) in sig.proofs.iter().zip(&opened) {
        field(
            proof.seed_info.len()
                == reveal_size(params.num_parties as usize, &[unopened], params.seed_size_bytes),
            "seedInfo length",
        )?;
        match (&proof.aux, unopened == params.last_party()) {
            (Some(aux), false) => {
                field(aux.len() == params.and_size_bytes(), "aux length")?;
                field(padding_is_zero(aux, params.and_size_bits()), "aux padding")?;
            }
            (None, true) => {}
            _ => return Err(Error::malformed("aux presence does not match challenge")),
        }
        field(proof.input.len() == params.state_size_bytes(), "input length")?;
        field(proof.msgs.len() == params.msgs_size_bytes(), "msgs length")?;
        field(padding_is_zero(&proof.msgs, params.msgs_size_bits()), "msgs padding")?;
        field(proof.commitment.len() == params.digest_size_bytes, "commitment length")?;
    }
    Ok(())
}

/// Encode a signature
pub fn serialize_signature(params: &ParameterSet, sig: &Signature) -> Result<Vec<u8>> {
    check_signature(params, sig)?;

    let mut out = Vec::with_capacity(signature_len(params, &sig.challenge_c, &sig.challenge_p));
    for &t in &sig.challenge_c {
        out.extend_from_slice(&u16_to_le_bytes(t));
    }
    for &j in &sig.challenge_p {
        out.extend_from_slice(&u16_to_le_bytes(j));
    }
    out.extend_from_slice(&sig.salt);
    out.extend_from_slice(&sig.iseed_info);
    out.extend_from_slice(&sig.cv_info);
    for proof in &sig.proofs {
        out.extend_from_slice(&proof.seed_info);
        if let Some(aux) = &proof.aux {
            out.extend_from_slice(aux);
        }
        out.extend_from_slice(&proof.input);
        out.extend_from_slice(&proof.msgs);
        out.extend_from_slice(&proof.commitment);
    }
    Ok(out)
}

/// Decode a signature, rejecting any length or padding mismatch
pub fn deserialize_signature(params: &ParameterSet, bytes: &[u8]) -> Result<Signature> {
    let tau = params.num_opened_repetitions as usize;
    if bytes.len() < 4 * tau + params.salt_size_bytes {
        return Err(Error::malformed("shorter than the fixed header"));
    }

    let mut reader = ByteReader::new(bytes);
    let challenge_c = (0..tau)
        .map(|_| reader.read_u16_le("challenge C"))
        .collect::<Result<Vec<_>>>()?;
    let challenge_p = (0..tau)
        .map(|_| reader.read_u16_le("challenge P"))
        .collect::<Result<Vec<_>>>()?;
    check_challenge(params, &challenge_c, &challenge_p)?;

    let expected = signature_len(params, &challenge_c, &challenge_p);
    if bytes.len() != expected {
        return Err(Error::malformed(format!(
            "length {} does not match challenge (expected {})",
            bytes.len(),
            expected
        )));
    }

    let num_reps = params.num_repetitions as usize;
    let salt = reader.read_vec(params.salt_size_bytes, "salt")?;
    let iseed_info = reader.read_vec(
        reveal_size(num_reps, &challenge_c, params.seed_size_bytes),
        "iSeedInfo",
    )?;
    let cv_info = reader.read_vec(
        open_size(
            num_reps,
            &missing_leaves(params, &challenge_c),
            params.digest_size_bytes,
        ),
        "cvInfo",
    )?;

    let mut proofs = Vec::with_capacity(tau);
    for (_, unopened) in opened_in_order(&challenge_c, &challenge_p) {
        let seed_info = reader.read_vec(
            reveal_size(params.num_parties as usize, &[unopened], params.seed_size_bytes),
            "seedInfo",
        )?;
        let aux = if unopened != params.last_party() {
            let aux = reader.read_vec(params.and_size_bytes(), "aux")?;
            if !padding_is_zero(&aux, params.and_size_bits()) {
                return Err(Error::malformed("non-zero aux padding"));
            }
            Some(aux)
        } else {
            None
        };
        let input = reader.read_vec(params.state_size_bytes(), "input")?;
        let msgs = reader.read_vec(params.msgs_size_bytes(), "msgs")?;
        if !padding_is_zero(&msgs, params.msgs_size_bits()) {
            return Err(Error::malformed("non-zero msgs padding"));
        }
        let commitment = reader.read_vec(params.digest_size_bytes, "commitment")?;
        proofs.push(Proof {
            seed_info,
            aux,
            input,
            msgs,
            commitment,
        });
    }

    Ok(Signature {
        challenge_c,
        challenge_p,
        salt,
        iseed_info,
        cv_info,
        proofs,
    })
}
