//! Signing and verification
//!
//! Both directions walk the same pipeline: expand the repetition seeds,
//! derive every party's tape, commit, simulate the online phase, fold the
//! per-repetition digests into `Ch` and the Merkle tree over `Cv`, then
//! derive the challenge. The signer opens the challenged repetitions; the
//! verifier rebuilds every digest from the signature and requires the same
//! challenge to come out.
//!
//! Repetitions are independent. With the `parallel` feature they run on the
//! rayon pool, each producing its own slot of the result vector.

use picnic_algorithms::{HashPrefix, LowMc, PicnicHash};
use picnic_internal::constant_time::{ct_eq_u16, xor_in_place};
use picnic_params::ParameterSet;
use tracing::{debug, error, instrument};
use zeroize::Zeroizing;

use super::challenge::{hcp, missing_leaves};
use super::commit::{commit, commit_h, commit_v};
use super::encoding::{check_signature, opened_in_order, Proof, Signature};
use super::keys::validate_keypair;
use super::merkle::MerkleTree;
use super::mpc::{compute_aux_tape, reconstruct, simulate_online};
use super::tape::{Msgs, RandomTapes};
use super::tree::SeedTree;
use crate::error::{Error, Result};

/// Run `f` for every repetition index, collecting results in order
fn map_repetitions<R, F>(count: usize, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Result<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..count).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

fn rejected(err: Error) -> Error {
    debug!("rejecting: {}", err);
    err
}

fn seed_or_malformed(tree: &SeedTree, index: usize) -> Result<&[u8]> {
    tree.leaf(index)
        .ok_or_else(|| Error::malformed("seed not recoverable from reveal"))
}

// salt || root = H(sk || message || pk || plaintext || LE16(state_size_bits))
fn salt_and_root_seed(
    params: &ParameterSet,
    private_key: &[u8],
    public_output: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let mut h = PicnicHash::new(params, HashPrefix::None)?;
    h.update(private_key)?;
    h.update(message)?;
    h.update(public_output)?;
    h.update(plaintext)?;
    h.update_u16_le(params.state_size_bits as u16)?;
    h.finalize()?;
    Ok(Zeroizing::new(
        h.squeeze_into_vec(params.salt_size_bytes + params.seed_size_bytes)?,
    ))
}

/// Seed commitments of every party; the last also binds the aux bits
fn party_commitments(
    params: &ParameterSet,
    seeds: &SeedTree,
    aux: &[u8],
    salt: &[u8],
    t: usize,
) -> Result<Vec<Vec<u8>>> {
    let last = params.last_party() as usize;
    (0..params.num_parties as usize)
        .map(|j| {
            let seed = seed_or_malformed(seeds, j)?;
            commit(params, seed, (j == last).then_some(aux), salt, t, j)
        })
        .collect()
}

struct SignerRepetition {
    seeds: SeedTree,
    aux: Vec<u8>,
    commitments: Vec<Vec<u8>>,
    masked_key: Vec<u8>,
    msgs: Msgs,
    ch: Vec<u8>,
    cv: Vec<u8>,
}

#[allow(clippy::too_many_arguments)]
fn sign_repetition(
    params: &ParameterSet,
    lowmc: &LowMc,
    iseeds: &SeedTree,
    salt: &[u8],
    t: usize,
    private_key: &[u8],
    public_output: &[u8],
    plaintext: &[u8],
) -> Result<SignerRepetition> {
    let seeds = SeedTree::generate(
        params,
        params.num_parties as usize,
        seed_or_malformed(iseeds, t)?,
        salt,
        t,
    )?;
    let mut tapes = RandomTapes::derive(params, &seeds, salt, t)?;

    compute_aux_tape(params, lowmc, &mut tapes);
    let aux = tapes.aux_bits(params);
    let commitments = party_commitments(params, &seeds, &aux, salt, t)?;

    let masks = tapes.next_words(params.state_size_bits);
    let mut masked_key = reconstruct(&masks);
    xor_in_place(&mut masked_key, private_key);

    let mut msgs = Msgs::new(params);
    if let Err(err) = simulate_online(
        params,
        lowmc,
        t,
        &masked_key,
        masks,
        &mut tapes,
        &mut msgs,
        plaintext,
        public_output,
    ) {
        // Unreachable with a validated key pair.
        error!(repetition = t, "signing simulation diverged: {}", err);
        panic!("picnic: MPC simulation inconsistent with a validated key pair in repetition {t}");
    }

    let ch = commit_h(params, &commitments)?;
    let cv = commit_v(params, &masked_key, &msgs)?;
    Ok(SignerRepetition {
        seeds,
        aux,
        commitments,
        masked_key,
        msgs,
        ch,
        cv,
    })
}

/// Sign `message` under the key `private_key` with public `(public_output, plaintext)`
///
/// # Panics
///
/// Panics if the online simulation disagrees with the public output after
/// the key pair has been validated. That is an engine fault, never an
/// input-dependent outcome.
#[instrument(skip_all, fields(params = params.name, message_len = message.len()))]
pub fn sign(
    params: &ParameterSet,
    private_key: &[u8],
    public_output: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> Result<Signature> {
    params.validate()?;
    validate_keypair(params, private_key, public_output, plaintext)?;

    let lowmc = LowMc::new(params);
    let num_reps = params.num_repetitions as usize;

    let salt_and_root = salt_and_root_seed(params, private_key, public_output, plaintext, message)?;
    let (salt, root) = salt_and_root.split_at(params.salt_size_bytes);
    let iseeds = SeedTree::generate(params, num_reps, root, salt, 0)?;

    let reps = map_repetitions(num_reps, |t| {
        sign_repetition(
            params,
            &lowmc,
            &iseeds,
            salt,
            t,
            private_key,
            public_output,
            plaintext,
        )
    })?;

    let ch: Vec<Vec<u8>> = reps.iter().map(|r| r.ch.clone()).collect();
    let cv: Vec<Vec<u8>> = reps.iter().map(|r| r.cv.clone()).collect();
    let tree = MerkleTree::build(params, &cv, salt)?;

    let challenge = hcp(params, &ch, tree.root(), salt, public_output, plaintext, message)?;
    debug!(opened = ?challenge.repetitions, "challenge derived");

    let cv_info = tree.open(&missing_leaves(params, &challenge.repetitions));
    let iseed_info = iseeds.reveal(&challenge.repetitions);

    let last = params.last_party();
    let proofs = opened_in_order(&challenge.repetitions, &challenge.parties)
        .into_iter()
        .map(|(t, unopened)| {
            let rep = &reps[t as usize];
            let j = unopened as usize;
            Proof {
                seed_info: rep.seeds.reveal(&[unopened]),
                aux: (unopened != last).then(|| rep.aux.clone()),
                input: rep.masked_key.clone(),
                msgs: rep.msgs.stream(j).to_vec(),
                commitment: rep.commitments[j].clone(),
            }
        })
        .collect();

    Ok(Signature {
        challenge_c: challenge.repetitions,
        challenge_p: challenge.parties,
        salt: salt.to_vec(),
        iseed_info,
        cv_info,
        proofs,
    })
}

struct VerifierRepetition {
    ch: Vec<u8>,
    cv: Option<Vec<u8>>,
}

#[allow(clippy::too_many_arguments)]
fn verify_repetition(
    params: &ParameterSet,
    lowmc: &LowMc,
    iseeds: &SeedTree,
    sig: &Signature,
    t: usize,
    public_output: &[u8],
    plaintext: &[u8],
) -> Result<VerifierRepetition> {
    let salt = &sig.salt[..];
    let num_parties = params.num_parties as usize;

    let Some(unopened) = sig.unopened_party(t as u16) else {
        // Not challenged: recompute every commitment from the revealed seed.
        let seeds = SeedTree::generate(params, num_parties, seed_or_malformed(iseeds, t)?, salt, t)?;
        let mut tapes = RandomTapes::derive(params, &seeds, salt, t)?;
        compute_aux_tape(params, lowmc, &mut tapes);
        let aux = tapes.aux_bits(params);
        let commitments = party_commitments(params, &seeds, &aux, salt, t)?;
        return Ok(VerifierRepetition {
            ch: commit_h(params, &commitments)?,
            cv: None,
        });
    };

    let proof = sig
        .proof(t as u16)
        .ok_or_else(|| Error::malformed("missing proof"))?;
    let unopened = unopened as usize;
    let last = params.last_party() as usize;

    let seeds = SeedTree::reconstruct(params, num_parties, &[unopened as u16], &proof.seed_info, salt, t)?;
    let mut tapes = RandomTapes::derive(params, &seeds, salt, t)?;

    let commitments = (0..num_parties)
        .map(|j| {
            if j == unopened {
                return Ok(proof.commitment.clone());
            }
            let aux = if j == last { proof.aux.as_deref() } else { None };
            commit(params, seed_or_malformed(&seeds, j)?, aux, salt, t, j)
        })
        .collect::<Result<Vec<_>>>()?;
    let ch = commit_h(params, &commitments)?;

    if let Some(aux) = &proof.aux {
        tapes.set_aux_bits(params, aux);
    }
    tapes.clear_party(unopened);
    let mut msgs = Msgs::with_unopened(params, unopened, &proof.msgs);

    let masks = tapes.next_words(params.state_size_bits);
    simulate_online(
        params,
        lowmc,
        t,
        &proof.input,
        masks,
        &mut tapes,
        &mut msgs,
        plaintext,
        public_output,
    )
    .map_err(|err| {
        debug!(repetition = t, "simulation does not reach the public output");
        err
    })?;

    Ok(VerifierRepetition {
        ch,
        cv: Some(commit_v(params, &proof.input, &msgs)?),
    })
}

/// Verify a signature; `Ok(())` accepts, any error rejects
#[instrument(skip_all, fields(params = params.name, message_len = message.len()))]
pub fn verify(
    params: &ParameterSet,
    public_output: &[u8],
    plaintext: &[u8],
    message: &[u8],
    sig: &Signature,
) -> Result<()> {
    params.validate()?;
    let n = params.state_size_bytes();
    if public_output.len() != n || plaintext.len() != n {
        return Err(Error::InvalidKey("public key component has the wrong length".into()));
    }
    check_signature(params, sig).map_err(rejected)?;

    let lowmc = LowMc::new(params);
    let num_reps = params.num_repetitions as usize;
    let salt = &sig.salt[..];

    let iseeds = SeedTree::reconstruct(params, num_reps, &sig.challenge_c, &sig.iseed_info, salt, 0)?;
    let reps = map_repetitions(num_reps, |t| {
        verify_repetition(params, &lowmc, &iseeds, sig, t, public_output, plaintext)
    })?;

    let ch: Vec<Vec<u8>> = reps.iter().map(|r| r.ch.clone()).collect();
    let cv: Vec<Option<Vec<u8>>> = reps.into_iter().map(|r| r.cv).collect();

    let mut tree = MerkleTree::new(params, num_reps);
    tree.add_nodes(&missing_leaves(params, &sig.challenge_c), &sig.cv_info)
        .map_err(rejected)?;
    let root = tree
        .verify(params, &cv, salt)
        .map_err(rejected)?
        .to_vec();

    let challenge = hcp(params, &ch, &root, salt, public_output, plaintext, message)?;
    if !(ct_eq_u16(&challenge.repetitions, &sig.challenge_c)
        & ct_eq_u16(&challenge.parties, &sig.challenge_p))
    {
        debug!("rejecting: recomputed challenge differs");
        return Err(Error::ChallengeMismatch);
    }
    Ok(())
}
