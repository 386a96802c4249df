use lsrpc_types::{X25519PublicKey, X25519_SECRET_KEY_SIZE};
use rand_core::CryptoRngCore;
use std::fmt;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

/// An X25519 secret scalar. Wraps the dalek secret so it zeroizes on drop
/// and never leaks through `Debug`.
#[derive(Clone)]
pub struct X25519SecretKey(StaticSecret);

impl X25519SecretKey {
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; X25519_SECRET_KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        let secret = StaticSecret::from(bytes);
        bytes.zeroize();
        Self(secret)
    }

    pub fn from_bytes(bytes: [u8; X25519_SECRET_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from_bytes(*PublicKey::from(&self.0).as_bytes())
    }

    /// Raw X25519 scalar multiplication with a peer public key. Both sides
    /// are clamped by the dalek implementation.
    pub fn diffie_hellman(&self, their_public: &X25519PublicKey) -> x25519_dalek::SharedSecret {
        self.0.diffie_hellman(&PublicKey::from(*their_public.as_bytes()))
    }
}

impl fmt::Debug for X25519SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519SecretKey([REDACTED])")
    }
}

/// A single-use X25519 keypair. One is generated per layer per request and
/// never persisted.
pub struct EphemeralKeypair {
    secret: X25519SecretKey,
    public: X25519PublicKey,
}

impl EphemeralKeypair {
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Self {
        let secret = X25519SecretKey::generate(rng);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn from_secret_bytes(bytes: [u8; X25519_SECRET_KEY_SIZE]) -> Self {
        let secret = X25519SecretKey::from_bytes(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn secret(&self) -> &X25519SecretKey {
        &self.secret
    }

    pub fn public(&self) -> &X25519PublicKey {
        &self.public
    }
}

impl fmt::Debug for EphemeralKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EphemeralKeypair(pub={})", self.public.to_hex())
    }
}
