//! Commitments to seeds, to a repetition's commitments and to its views

use picnic_algorithms::{HashPrefix, PicnicHash};
use picnic_params::ParameterSet;

use super::tape::Msgs;
use crate::error::Result;

/// `C[t][j] = H(seed || [aux] || salt || t || j)`
pub(crate) fn commit(
    params: &ParameterSet,
    seed: &[u8],
    aux: Option<&[u8]>,
    salt: &[u8],
    rep_index: usize,
    party: usize,
) -> Result<Vec<u8>> {
    let mut h = PicnicHash::new(params, HashPrefix::None)?;
    h.update(seed)?;
    if let Some(aux) = aux {
        h.update(aux)?;
    }
    h.update(salt)?;
    h.update_u16_le(rep_index as u16)?;
    h.update_u16_le(party as u16)?;
    h.finalize()?;
    Ok(h.squeeze_into_vec(params.digest_size_bytes)?)
}

/// `Ch[t] = H(C[t][0] || ... || C[t][N-1])`
pub(crate) fn commit_h(params: &ParameterSet, party_commitments: &[Vec<u8>]) -> Result<Vec<u8>> {
    let parts: Vec<&[u8]> = party_commitments.iter().map(Vec::as_slice).collect();
    Ok(PicnicHash::digest(
        params,
        HashPrefix::None,
        &parts,
        params.digest_size_bytes,
    )?)
}

/// `Cv[t] = H(masked_key || msgs[0] || ... || msgs[N-1])` over the written part of each stream
pub(crate) fn commit_v(params: &ParameterSet, masked_key: &[u8], msgs: &Msgs) -> Result<Vec<u8>> {
    let mut h = PicnicHash::new(params, HashPrefix::None)?;
    h.update(masked_key)?;
    for party in 0..msgs.num_parties() {
        h.update(msgs.written(party))?;
    }
    h.finalize()?;
    Ok(h.squeeze_into_vec(params.digest_size_bytes)?)
}
