//! Executes a scenario: key generation, signing, length check,
//! verification and one rejection per tamper entry.

use picnic_sign::pq::picnic::{
    deserialize_signature, generate_keypair, serialize_signature, sign, signature_len, verify,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::error::{Result, ScenarioError};
use super::model::{Scenario, Tamper};

/// What a successful run observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub signature_len: usize,
    pub rejected: usize,
}

pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioOutcome> {
    let params = scenario.params()?;
    let message = scenario.message_bytes()?;
    let mut rng = ChaCha20Rng::seed_from_u64(scenario.rng_seed);
    let (pk, sk) = generate_keypair(&params, &mut rng)?;

    let sig = sign(&params, sk.key(), pk.ciphertext(), pk.plaintext(), &message)?;
    let bytes = serialize_signature(&params, &sig)?;
    let expected = signature_len(&params, &sig.challenge_c, &sig.challenge_p);
    if bytes.len() != expected {
        return Err(ScenarioError::Mismatch {
            expected: expected.to_string(),
            actual: bytes.len().to_string(),
        });
    }

    let decoded = deserialize_signature(&params, &bytes)?;
    verify(&params, pk.ciphertext(), pk.plaintext(), &message, &decoded)?;

    let tau = params.num_opened_repetitions as usize;
    for &tamper in &scenario.tamper {
        let mut corrupted = bytes.clone();
        match tamper {
            Tamper::ChallengeC { index } => corrupted[index % (2 * tau)] ^= 0x01,
            Tamper::ChallengeP { index } => corrupted[2 * tau + index % (2 * tau)] ^= 0x01,
            Tamper::Salt { index } => corrupted[4 * tau + index % params.salt_size_bytes] ^= 0x01,
            Tamper::Input { bit } => {
                // The first proof's input sits after its seed reveal and aux
                let first = &sig.proofs[0];
                let offset = 4 * tau
                    + params.salt_size_bytes
                    + sig.iseed_info.len()
                    + sig.cv_info.len()
                    + first.seed_info.len()
                    + first.aux.as_ref().map_or(0, Vec::len);
                corrupted[offset] ^= 1 << (bit % 8);
            }
            Tamper::Commitment { bit } => {
                let last = corrupted.len() - 1;
                corrupted[last] ^= 1 << (bit % 8);
            }
            Tamper::Truncate => {
                corrupted.pop();
            }
        }

        let accepted = deserialize_signature(&params, &corrupted)
            .and_then(|s| verify(&params, pk.ciphertext(), pk.plaintext(), &message, &s))
            .is_ok();
        if accepted {
            return Err(ScenarioError::Accepted(tamper));
        }
    }

    Ok(ScenarioOutcome {
        signature_len: bytes.len(),
        rejected: scenario.tamper.len(),
    })
}
