//! Integration tests for Picnic2 signatures

use picnic_api::{Serialize, Signature, SignatureSerialize};
use picnic_params::{ParameterSet, PICNIC2_L1_FS};
use picnic_sign::pq::picnic::{
    deserialize_signature, generate_keypair, max_signature_len, serialize_signature, sign,
    signature_len, verify, Picnic2L1Fs, Picnic2L3Fs, Picnic2L5Fs, PicnicPublicKey,
};
use picnic_tests::scenarios::{load_scenarios, run_scenario, scenario_path, Tamper};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn small_params() -> ParameterSet {
    ParameterSet::custom("small", 16, 4, 2, 16, 32, 32, 128, 20, 10).unwrap()
}

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

// ========== Scenario Files ==========

#[test]
fn test_scenario_file() {
    let file = load_scenarios(&scenario_path("scenarios.toml")).unwrap();
    assert!(!file.scenario.is_empty());
    for scenario in &file.scenario {
        let outcome = run_scenario(scenario)
            .unwrap_or_else(|e| panic!("scenario {} failed: {}", scenario.name, e));
        assert_eq!(outcome.rejected, scenario.tamper.len(), "{}", scenario.name);
    }
}

#[test]
fn test_scenario_tamper_parsing() {
    let file: picnic_tests::scenarios::ScenarioFile = toml::from_str(
        r#"
        [[scenario]]
        name = "inline"
        parties = 4
        repetitions = 3
        opened = 1
        rng_seed = 9
        message = "00"
        tamper = [{ field = "salt", index = 3 }, { field = "truncate" }]
        "#,
    )
    .unwrap();
    let scenario = &file.scenario[0];
    assert_eq!(scenario.tamper, vec![Tamper::Salt { index: 3 }, Tamper::Truncate]);
    assert_eq!(scenario.state_bits, 128);
    assert!(run_scenario(scenario).is_ok());
}

#[test]
fn test_scenario_rejects_bad_params() {
    let file: picnic_tests::scenarios::ScenarioFile = toml::from_str(
        r#"
        [[scenario]]
        name = "too-many-opened"
        parties = 4
        repetitions = 3
        opened = 3
        rng_seed = 9
        message = ""
        "#,
    )
    .unwrap();
    assert!(run_scenario(&file.scenario[0]).is_err());
}

// ========== Small Parameter Set ==========

#[test]
fn test_small_sign_verify_abc() {
    let params = small_params();
    let (pk, sk) = generate_keypair(&params, &mut rng(7)).unwrap();
    let sig = sign(&params, sk.key(), pk.ciphertext(), pk.plaintext(), b"abc").unwrap();

    let bytes = serialize_signature(&params, &sig).unwrap();
    assert_eq!(bytes.len(), signature_len(&params, &sig.challenge_c, &sig.challenge_p));
    assert!(bytes.len() <= max_signature_len(&params));

    let decoded = deserialize_signature(&params, &bytes).unwrap();
    assert_eq!(decoded, sig);
    assert!(verify(&params, pk.ciphertext(), pk.plaintext(), b"abc", &decoded).is_ok());

    // Salt starts after C and P
    let mut corrupted = bytes.clone();
    corrupted[8] ^= 0x01;
    let rejected = deserialize_signature(&params, &corrupted)
        .and_then(|s| verify(&params, pk.ciphertext(), pk.plaintext(), b"abc", &s));
    assert!(rejected.is_err());
}

#[test]
fn test_small_wrong_public_key() {
    let params = small_params();
    let (pk, sk) = generate_keypair(&params, &mut rng(7)).unwrap();
    let (other, _) = generate_keypair(&params, &mut rng(8)).unwrap();
    let sig = sign(&params, sk.key(), pk.ciphertext(), pk.plaintext(), b"abc").unwrap();

    assert!(verify(&params, other.ciphertext(), other.plaintext(), b"abc", &sig).is_err());
    assert!(verify(&params, &pk.ciphertext()[..15], pk.plaintext(), b"abc", &sig).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_small_signatures_verify(seed in any::<u64>(), message in proptest::collection::vec(any::<u8>(), 0..64)) {
        let params = small_params();
        let (pk, sk) = generate_keypair(&params, &mut rng(seed)).unwrap();
        let sig = sign(&params, sk.key(), pk.ciphertext(), pk.plaintext(), &message).unwrap();
        let bytes = serialize_signature(&params, &sig).unwrap();
        let decoded = deserialize_signature(&params, &bytes).unwrap();
        prop_assert!(verify(&params, pk.ciphertext(), pk.plaintext(), &message, &decoded).is_ok());
    }

    #[test]
    fn prop_small_rejects_any_bit_flip(byte in any::<prop::sample::Index>(), bit in 0u8..8) {
        let params = small_params();
        let (pk, sk) = generate_keypair(&params, &mut rng(11)).unwrap();
        let sig = sign(&params, sk.key(), pk.ciphertext(), pk.plaintext(), b"flip").unwrap();
        let mut bytes = serialize_signature(&params, &sig).unwrap();
        let at = byte.index(bytes.len());
        bytes[at] ^= 1 << bit;
        let accepted = deserialize_signature(&params, &bytes)
            .and_then(|s| verify(&params, pk.ciphertext(), pk.plaintext(), b"flip", &s))
            .is_ok();
        prop_assert!(!accepted, "flip at byte {} bit {} accepted", at, bit);
    }

    #[test]
    fn prop_deserialize_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = deserialize_signature(&small_params(), &bytes);
    }
}

// ========== Preset Parameter Sets ==========

#[test]
fn test_picnic2_l1_signature() {
    let (public_key, secret_key) = Picnic2L1Fs::keypair(&mut rng(1)).unwrap();
    let message = b"Test message for Picnic2 signature";

    let signature = Picnic2L1Fs::sign(message, &secret_key).unwrap();
    assert!(signature.as_ref().len() <= Picnic2L1Fs::MAX_SIGNATURE_SIZE);
    assert!(Picnic2L1Fs::verify(message, &signature, &public_key).is_ok());

    let modified = b"Modified message that should not verify";
    let err = Picnic2L1Fs::verify(modified, &signature, &public_key).unwrap_err();
    assert!(err.is_rejection());
}

#[test]
fn test_picnic2_l1_key_encodings() {
    let (pk, _) = Picnic2L1Fs::keypair(&mut rng(2)).unwrap();
    let bytes = Serialize::to_bytes(&pk);
    assert_eq!(bytes.len(), PICNIC2_L1_FS.public_key_bytes());
    assert_eq!(bytes[0], PICNIC2_L1_FS.id);
    assert_eq!(<PicnicPublicKey as Serialize>::from_bytes(&bytes).unwrap(), pk);
    assert_eq!(Picnic2L1Fs::deserialize_public_key(&bytes).unwrap(), pk);

    // An L1 key cannot be read as an L3 key
    assert!(Picnic2L3Fs::deserialize_public_key(&bytes).is_err());
}

#[test]
#[ignore = "slow in debug builds"]
fn test_picnic2_l3_signature() {
    let (pk, sk) = Picnic2L3Fs::keypair(&mut rng(3)).unwrap();
    let sig = Picnic2L3Fs::sign(b"level three", &sk).unwrap();
    assert!(Picnic2L3Fs::verify(b"level three", &sig, &pk).is_ok());
    assert!(Picnic2L3Fs::verify(b"level 3", &sig, &pk).is_err());
}

#[test]
#[ignore = "slow in debug builds"]
fn test_picnic2_l5_signature() {
    let (pk, sk) = Picnic2L5Fs::keypair(&mut rng(5)).unwrap();
    let sig = Picnic2L5Fs::sign(b"level five", &sk).unwrap();
    assert!(Picnic2L5Fs::verify(b"level five", &sig, &pk).is_ok());
}
