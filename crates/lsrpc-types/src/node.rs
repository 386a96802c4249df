use crate::{Ed25519PublicKey, KeyError, X25519PublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A service-node directory entry as returned by the seed JSON-RPC.
///
/// Field names match the `get_n_service_nodes` response rows so the struct
/// deserializes straight out of `result.service_node_states[]`. Keys are kept
/// in their hex form here; decommissioned nodes routinely appear with empty
/// strings, which [`ServiceNode::is_valid`] filters out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceNode {
    pub pubkey_ed25519: String,
    pub pubkey_x25519: String,
    pub public_ip: String,
    pub storage_port: u16,
    pub storage_lmq_port: u16,
    pub swarm_id: u64,
}

impl Default for ServiceNode {
    fn default() -> Self {
        Self {
            pubkey_ed25519: String::new(),
            pubkey_x25519: String::new(),
            public_ip: String::new(),
            storage_port: 0,
            storage_lmq_port: 0,
            swarm_id: 0,
        }
    }
}

impl ServiceNode {
    /// A node is usable as an onion hop iff all four routing-critical fields
    /// are populated: both keys, a public IP, and a storage port.
    pub fn is_valid(&self) -> bool {
        !self.pubkey_ed25519.is_empty()
            && !self.pubkey_x25519.is_empty()
            && !self.public_ip.is_empty()
            && self.public_ip != "0.0.0.0"
            && self.storage_port != 0
    }
}

/// A chosen member of an onion path, projected from a [`ServiceNode`].
/// Lives for a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct PathHop {
    pub ed25519_pubkey: Ed25519PublicKey,
    pub x25519_pubkey: X25519PublicKey,
    pub ip: String,
    pub port: u16,
}

impl TryFrom<&ServiceNode> for PathHop {
    type Error = KeyError;

    fn try_from(node: &ServiceNode) -> Result<Self, KeyError> {
        Ok(Self {
            ed25519_pubkey: Ed25519PublicKey::from_hex(&node.pubkey_ed25519)?,
            x25519_pubkey: X25519PublicKey::from_hex(&node.pubkey_x25519)?,
            ip: node.public_ip.clone(),
            port: node.storage_port,
        })
    }
}

impl fmt::Debug for PathHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PathHop({}:{} ed25519={}...)",
            self.ip,
            self.port,
            &self.ed25519_pubkey.to_hex()[..8]
        )
    }
}
