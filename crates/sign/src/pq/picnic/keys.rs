//! Key generation and key encodings
//!
//! A key pair is a LowMC key `sk`, a random plaintext `p` and the public
//! ciphertext `c = LowMC_sk(p)`.

use picnic_algorithms::LowMc;
use picnic_api::{Result as ApiResult, Serialize, SerializeSecret};
use picnic_internal::constant_time::ct_eq;
use picnic_params::ParameterSet;
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Picnic public key: cipher output and plaintext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PicnicPublicKey {
    pub(crate) params: ParameterSet,
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) plaintext: Vec<u8>,
}

/// Picnic secret key: the cipher key and its public key
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PicnicSecretKey {
    #[zeroize(skip)]
    pub(crate) public: PicnicPublicKey,
    pub(crate) key: Vec<u8>,
}

impl core::fmt::Debug for PicnicSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PicnicSecretKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

impl PicnicPublicKey {
    /// Cipher output
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Cipher input
    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }

    /// Parameter set the key belongs to
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Parse `[id][ciphertext][plaintext]` for a known parameter set
    pub fn decode(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.public_key_bytes() {
            return Err(Error::InvalidKey(format!(
                "public key must be {} bytes, got {}",
                params.public_key_bytes(),
                bytes.len()
            )));
        }
        if bytes[0] != params.id {
            return Err(Error::InvalidKey("public key is for another parameter set".into()));
        }
        let n = params.state_size_bytes();
        Ok(Self {
            params: *params,
            ciphertext: bytes[1..1 + n].to_vec(),
            plaintext: bytes[1 + n..1 + 2 * n].to_vec(),
        })
    }
}

impl PicnicSecretKey {
    /// Matching public key
    pub fn public_key(&self) -> &PicnicPublicKey {
        &self.public
    }

    /// Cipher key bytes
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Parse `[id][key][ciphertext][plaintext]` for a known parameter set
    pub fn decode(params: &ParameterSet, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.secret_key_bytes() {
            return Err(Error::InvalidKey(format!(
                "secret key must be {} bytes, got {}",
                params.secret_key_bytes(),
                bytes.len()
            )));
        }
        if bytes[0] != params.id {
            return Err(Error::InvalidKey("secret key is for another parameter set".into()));
        }
        let n = params.state_size_bytes();
        Ok(Self {
            key: bytes[1..1 + n].to_vec(),
            public: PicnicPublicKey {
                params: *params,
                ciphertext: bytes[1 + n..1 + 2 * n].to_vec(),
                plaintext: bytes[1 + 2 * n..1 + 3 * n].to_vec(),
            },
        })
    }
}

fn preset_for(bytes: &[u8]) -> Result<ParameterSet> {
    let id = *bytes
        .first()
        .ok_or_else(|| Error::InvalidKey("empty key encoding".into()))?;
    ParameterSet::from_id(id).ok_or_else(|| Error::InvalidKey(format!("unknown parameter set id {}", id)))
}

// Preset keys are self-describing through their id byte.
impl Serialize for PicnicPublicKey {
    fn from_bytes(bytes: &[u8]) -> ApiResult<Self> {
        let params = preset_for(bytes)?;
        Ok(Self::decode(&params, bytes)?)
    }

    /// `[id][ciphertext][plaintext]`
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.params.public_key_bytes());
        out.push(self.params.id);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.plaintext);
        out
    }
}

impl SerializeSecret for PicnicSecretKey {
    fn from_bytes(bytes: &[u8]) -> ApiResult<Self> {
        let params = preset_for(bytes)?;
        Ok(Self::decode(&params, bytes)?)
    }

    /// `[id][key][ciphertext][plaintext]`
    fn to_bytes_zeroizing(&self) -> Zeroizing<Vec<u8>> {
        let params = &self.public.params;
        let mut out = Zeroizing::new(Vec::with_capacity(params.secret_key_bytes()));
        out.push(params.id);
        out.extend_from_slice(&self.key);
        out.extend_from_slice(&self.public.ciphertext);
        out.extend_from_slice(&self.public.plaintext);
        out
    }
}

/// Generate a key pair from the injected RNG
#[instrument(skip_all, fields(params = params.name))]
pub fn generate_keypair<R: CryptoRng + RngCore>(
    params: &ParameterSet,
    rng: &mut R,
) -> Result<(PicnicPublicKey, PicnicSecretKey)> {
    params.validate()?;
    let n = params.state_size_bytes();

    let mut key = vec![0u8; n];
    let mut plaintext = vec![0u8; n];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut plaintext);

    let ciphertext = LowMc::new(params).encrypt(&key, &plaintext)?;
    let public = PicnicPublicKey {
        params: *params,
        ciphertext,
        plaintext,
    };
    debug!("generated key pair");
    Ok((
        public.clone(),
        PicnicSecretKey {
            public,
            key,
        },
    ))
}

/// Check that `key` encrypts `plaintext` to `ciphertext`
pub fn validate_keypair(
    params: &ParameterSet,
    key: &[u8],
    ciphertext: &[u8],
    plaintext: &[u8],
) -> Result<()> {
    let n = params.state_size_bytes();
    if key.len() != n || ciphertext.len() != n || plaintext.len() != n {
        return Err(Error::InvalidKey("key component has the wrong length".into()));
    }
    let expected = Zeroizing::new(LowMc::new(params).encrypt(key, plaintext)?);
    if !ct_eq(&expected[..], ciphertext) {
        return Err(Error::InvalidKey("secret key does not match public key".into()));
    }
    Ok(())
}
