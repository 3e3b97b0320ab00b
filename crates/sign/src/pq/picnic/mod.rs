//! Picnic2 signatures
//!
//! A Picnic2 signature is a non-interactive zero-knowledge proof of
//! knowledge of a LowMC key `sk` with `LowMC_sk(p) = c` for a public pair
//! `(c, p)`. The proof follows the MPC-in-the-head paradigm with
//! preprocessing: the signer runs `T` independent simulations of `N`
//! virtual parties evaluating LowMC on a secret-shared key, commits to
//! every party's randomness and every repetition's broadcast messages, and
//! opens `tau` repetitions chosen by a Fiat-Shamir hash, each with all
//! parties but one revealed.
//!
//! Submodules:
//! - `tree.rs`: seed trees with compact "all but k" reveals.
//! - `merkle.rs`: the Merkle tree over per-repetition view commitments.
//! - `tape.rs`: random tapes and broadcast streams with their cursors.
//! - `mpc.rs`: the bit-sliced preprocessing and online simulations.
//! - `commit.rs`: seed, repetition and view commitments.
//! - `challenge.rs`: challenge derivation from the transcript.
//! - `encoding.rs`: the in-memory signature and its wire format.
//! - `keys.rs`: key generation and key encodings.
//! - `sign.rs`: the signing and verification pipelines.

use core::marker::PhantomData;

use picnic_api::{
    Result as ApiResult, Serialize, SerializeSecret, Signature as SignatureTrait,
    SignatureSerialize,
};
use picnic_params::{
    Picnic2L1FsParams, Picnic2L3FsParams, Picnic2L5FsParams, PicnicSchemeParams,
};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

mod challenge;
mod commit;
mod encoding;
mod keys;
mod merkle;
mod mpc;
mod sign;
mod tape;
mod tree;

pub use encoding::{
    deserialize_signature, max_signature_len, serialize_signature, signature_len, Proof,
    Signature,
};
pub use keys::{generate_keypair, validate_keypair, PicnicPublicKey, PicnicSecretKey};
pub use sign::{sign, verify};

/// Serialized Picnic signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PicnicSignatureData(pub(crate) Vec<u8>);

impl PicnicSignatureData {
    /// Wrap signature bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PicnicSignatureData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Picnic2 bound to a preset at the type level
pub struct Picnic<P: PicnicSchemeParams> {
    _params: PhantomData<P>,
}

impl<P: PicnicSchemeParams> SignatureTrait for Picnic<P> {
    type PublicKey = PicnicPublicKey;
    type SecretKey = PicnicSecretKey;
    type SignatureData = PicnicSignatureData;
    type KeyPair = (Self::PublicKey, Self::SecretKey);

    fn name() -> &'static str {
        P::NAME
    }

    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> ApiResult<Self::KeyPair> {
        Ok(generate_keypair(&P::PARAMS, rng)?)
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.0.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.1.clone()
    }

    fn sign(message: &[u8], secret_key: &Self::SecretKey) -> ApiResult<Self::SignatureData> {
        let params = &P::PARAMS;
        let pk = secret_key.public_key();
        let sig = sign(params, secret_key.key(), pk.ciphertext(), pk.plaintext(), message)?;
        Ok(PicnicSignatureData(serialize_signature(params, &sig)?))
    }

    fn verify(
        message: &[u8],
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> ApiResult<()> {
        let params = &P::PARAMS;
        if public_key.params() != params {
            return Err(picnic_api::Error::InvalidKey {
                context: "picnic verify",
                message: "public key is for another parameter set".into(),
            });
        }
        let sig = deserialize_signature(params, &signature.0)?;
        verify(
            params,
            public_key.ciphertext(),
            public_key.plaintext(),
            message,
            &sig,
        )?;
        Ok(())
    }
}

impl<P: PicnicSchemeParams> SignatureSerialize for Picnic<P> {
    const PUBLIC_KEY_SIZE: usize = P::PARAMS.public_key_bytes();
    const SECRET_KEY_SIZE: usize = P::PARAMS.secret_key_bytes();
    const MAX_SIGNATURE_SIZE: usize = max_signature_len(&P::PARAMS);

    fn serialize_public_key(key: &Self::PublicKey) -> Vec<u8> {
        Serialize::to_bytes(key)
    }

    fn deserialize_public_key(bytes: &[u8]) -> ApiResult<Self::PublicKey> {
        Ok(PicnicPublicKey::decode(&P::PARAMS, bytes)?)
    }

    fn serialize_secret_key(key: &Self::SecretKey) -> Zeroizing<Vec<u8>> {
        key.to_bytes_zeroizing()
    }

    fn deserialize_secret_key(bytes: &[u8]) -> ApiResult<Self::SecretKey> {
        let sk = PicnicSecretKey::decode(&P::PARAMS, bytes)?;
        let pk = sk.public_key();
        validate_keypair(&P::PARAMS, sk.key(), pk.ciphertext(), pk.plaintext())?;
        Ok(sk)
    }

    fn serialize_signature(sig: &Self::SignatureData) -> Vec<u8> {
        sig.0.clone()
    }

    fn deserialize_signature(bytes: &[u8]) -> ApiResult<Self::SignatureData> {
        deserialize_signature(&P::PARAMS, bytes)?;
        Ok(PicnicSignatureData(bytes.to_vec()))
    }
}

/// Picnic2 at NIST level 1
pub type Picnic2L1Fs = Picnic<Picnic2L1FsParams>;

/// Picnic2 at NIST level 3
pub type Picnic2L3Fs = Picnic<Picnic2L3FsParams>;

/// Picnic2 at NIST level 5
pub type Picnic2L5Fs = Picnic<Picnic2L5FsParams>;
