use crate::X25519SecretKey;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hmac::{Hmac, Mac};
use lsrpc_types::{CryptoError, X25519PublicKey, IV_SIZE, TAG_SIZE};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// HMAC key for the symmetric-key schedule. Shared with the storage-server
/// side of the protocol; both directions derive the same key from the X25519
/// shared secret.
const KEY_SCHEDULE_SALT: &[u8] = b"LOKI";

/// Layer cipher negotiated in routing metadata. AES-GCM is the only cipher
/// this client emits or accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncType {
    #[serde(rename = "aes-gcm")]
    AesGcm,
}

impl fmt::Display for EncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncType::AesGcm => write!(f, "aes-gcm"),
        }
    }
}

impl FromStr for EncType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, CryptoError> {
        match s {
            "aes-gcm" => Ok(EncType::AesGcm),
            other => Err(CryptoError::Backend(format!(
                "unsupported enc_type: {other}"
            ))),
        }
    }
}

/// A derived per-hop AES-256-GCM key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HopKey(pub(crate) [u8; 32]);

impl HopKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for HopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HopKey([REDACTED])")
    }
}

/// Derives the symmetric key for one hop: `HMAC-SHA256("LOKI", X25519(s, P))`.
///
/// Direction-agnostic: the sender passes its ephemeral secret and the hop's
/// public key, the hop passes its long-term secret and the sender's
/// ephemeral public key, and both arrive at the same key.
pub fn derive_hop_key(local_secret: &X25519SecretKey, remote_public: &X25519PublicKey) -> HopKey {
    let shared = local_secret.diffie_hellman(remote_public);

    let mut mac = <HmacSha256 as Mac>::new_from_slice(KEY_SCHEDULE_SALT)
        .expect("hmac accepts keys of any length");
    mac.update(shared.as_bytes());

    let digest = mac.finalize().into_bytes();
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    HopKey(key)
}

/// Seals one onion layer: `IV(12) || AES-256-GCM(plaintext) || tag(16)`,
/// keyed for `remote_public` using `local_secret`.
pub fn seal<R: CryptoRngCore + ?Sized>(
    plaintext: &[u8],
    remote_public: &X25519PublicKey,
    local_secret: &X25519SecretKey,
    rng: &mut R,
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_hop_key(local_secret, remote_public);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| CryptoError::Backend(e.to_string()))?;

    let mut iv = [0u8; IV_SIZE];
    rng.try_fill_bytes(&mut iv)
        .map_err(|e| CryptoError::Rng(e.to_string()))?;
    let nonce = Nonce::from_slice(&iv);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Backend(e.to_string()))?;

    let mut sealed = Vec::with_capacity(IV_SIZE + ciphertext.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Opens one onion layer sealed by [`seal`]. The receiver passes its own
/// long-term secret and the sender's ephemeral public key.
pub fn open(
    sealed: &[u8],
    remote_public: &X25519PublicKey,
    local_secret: &X25519SecretKey,
) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < IV_SIZE + TAG_SIZE {
        return Err(CryptoError::Short(sealed.len()));
    }

    let key = derive_hop_key(local_secret, remote_public);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| CryptoError::Backend(e.to_string()))?;

    let nonce = Nonce::from_slice(&sealed[..IV_SIZE]);
    cipher
        .decrypt(nonce, &sealed[IV_SIZE..])
        .map_err(|_| CryptoError::Auth)
}
