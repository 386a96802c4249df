use lsrpc_crypto::EncType;
use lsrpc_types::{Destination, PathHop, Protocol, X25519PublicKey};
use serde::{Deserialize, Serialize};

/// Routing block for an intermediate hop: who to forward to, and the
/// ephemeral key the next hop must use to derive its layer key.
///
/// Field order is the wire order; serde_json emits struct fields as declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRoute {
    pub destination: String,
    pub ephemeral_key: String,
    pub enc_type: EncType,
}

impl RelayRoute {
    pub fn new(next_hop: &PathHop, next_ephemeral: &X25519PublicKey) -> Self {
        Self {
            destination: next_hop.ed25519_pubkey.to_hex(),
            ephemeral_key: next_ephemeral.to_hex(),
            enc_type: EncType::AesGcm,
        }
    }
}

/// Routing block for the terminal hop: the plain HTTP target it calls out to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRoute {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub target: String,
}

impl From<&Destination> for ExitRoute {
    fn from(dst: &Destination) -> Self {
        Self {
            host: dst.host.clone(),
            port: dst.port,
            protocol: dst.protocol,
            target: dst.target.clone(),
        }
    }
}

/// Plaintext metadata on the outermost wrapper: the ephemeral key the entry
/// hop derives its layer key from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperMeta {
    pub ephemeral_key: String,
    pub enc_type: EncType,
}

impl WrapperMeta {
    pub fn new(ephemeral: &X25519PublicKey) -> Self {
        Self {
            ephemeral_key: ephemeral.to_hex(),
            enc_type: EncType::AesGcm,
        }
    }
}

/// Tail of the innermost frame, addressed to the destination itself. Only a
/// minimal `{"headers":{}}` annotation; host/port/protocol/target live in
/// the terminal hop's [`ExitRoute`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerRoute {
    pub headers: serde_json::Map<String, serde_json::Value>,
}
