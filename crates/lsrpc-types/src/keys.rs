use crate::{KeyError, ED25519_PUBLIC_KEY_SIZE, X25519_PUBLIC_KEY_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ed25519 identity key of a service node. Used only as an opaque routing
/// address in intermediate-hop metadata; this client never verifies
/// signatures with it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ed25519PublicKey(pub [u8; ED25519_PUBLIC_KEY_SIZE]);

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: [u8; ED25519_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        Ok(Self(decode_key_hex::<ED25519_PUBLIC_KEY_SIZE>(s)?))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Ed25519PublicKey {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, KeyError> {
        Self::from_hex(&s)
    }
}

impl From<Ed25519PublicKey> for String {
    fn from(key: Ed25519PublicKey) -> String {
        key.to_hex()
    }
}

/// X25519 encryption key of a service node or an ephemeral sender identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct X25519PublicKey(pub [u8; X25519_PUBLIC_KEY_SIZE]);

impl X25519PublicKey {
    pub fn from_bytes(bytes: [u8; X25519_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; X25519_PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        Ok(Self(decode_key_hex::<X25519_PUBLIC_KEY_SIZE>(s)?))
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for X25519PublicKey {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, KeyError> {
        Self::from_hex(&s)
    }
}

impl From<X25519PublicKey> for String {
    fn from(key: X25519PublicKey) -> String {
        key.to_hex()
    }
}

fn decode_key_hex<const N: usize>(s: &str) -> Result<[u8; N], KeyError> {
    let bytes = hex::decode(s).map_err(|e| KeyError::Hex(e.to_string()))?;
    if bytes.len() != N {
        return Err(KeyError::Length {
            got: bytes.len(),
            expected: N,
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let key = X25519PublicKey::from_bytes([0xab; 32]);
        assert_eq!(key.to_hex().len(), 64);

        let parsed = X25519PublicKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn test_hex_is_lowercase() {
        let key = Ed25519PublicKey::from_bytes([0xAB; 32]);
        assert_eq!(key.to_hex(), "ab".repeat(32));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = X25519PublicKey::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            KeyError::Length {
                got: 2,
                expected: 32
            }
        );
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert!(matches!(
            Ed25519PublicKey::from_hex(&"zz".repeat(32)),
            Err(KeyError::Hex(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let key = X25519PublicKey::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));

        let back: X25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
