use crate::frame;
use crate::path::select_path;
use crate::routing::{ExitRoute, InnerRoute, RelayRoute, WrapperMeta};
use lsrpc_crypto::EphemeralKeypair;
use lsrpc_types::{BuildError, Destination, PathError, PathHop, ServiceNode, X25519PublicKey};
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// A fully assembled onion request: the outermost wrapper bytes, the entry
/// hop they must be POSTed to, and the ephemeral public key the entry hop
/// uses for its layer (also embedded in the wrapper metadata).
#[derive(Clone)]
pub struct OnionEnvelope {
    pub bytes: Vec<u8>,
    pub entry: PathHop,
    pub entry_ephemeral_pub: X25519PublicKey,
}

impl fmt::Debug for OnionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OnionEnvelope({} bytes, entry {}:{})",
            self.bytes.len(),
            self.entry.ip,
            self.entry.port
        )
    }
}

/// Builds the envelope for a fixed path, innermost layer first.
///
/// Each iteration seals the running blob for hop `i` with a fresh ephemeral
/// keypair and records that keypair's public key in the routing block of the
/// layer *outside* it (or, for the entry hop, in the plaintext wrapper
/// metadata) so each hop learns the key for its successor's layer.
pub fn build_with_path<R: CryptoRngCore + ?Sized>(
    payload: &serde_json::Value,
    destination: &Destination,
    path: &[PathHop],
    rng: &mut R,
) -> Result<OnionEnvelope, BuildError> {
    if path.is_empty() {
        return Err(PathError::ZeroLength.into());
    }
    destination
        .validate()
        .map_err(BuildError::InvalidDestination)?;

    let payload_bytes = serde_json::to_vec(payload)?;
    let inner_route = serde_json::to_vec(&InnerRoute::default())?;
    let mut blob = frame::encode(&payload_bytes, &inner_route)?;

    // Per-request sender identity presented to the terminal hop.
    let final_keypair = EphemeralKeypair::generate(rng);
    let mut next_ephemeral = *final_keypair.public();

    for (i, hop) in path.iter().enumerate().rev() {
        let hop_keypair = EphemeralKeypair::generate(rng);

        let routing = if i == path.len() - 1 {
            serde_json::to_vec(&ExitRoute::from(destination))?
        } else {
            serde_json::to_vec(&RelayRoute::new(&path[i + 1], &next_ephemeral))?
        };

        let layer_plain = frame::encode(&blob, &routing)?;
        blob = lsrpc_crypto::seal(&layer_plain, &hop.x25519_pubkey, hop_keypair.secret(), rng)?;
        next_ephemeral = *hop_keypair.public();
    }

    let wrapper_meta = serde_json::to_vec(&WrapperMeta::new(&next_ephemeral))?;
    let wrapper = frame::encode(&blob, &wrapper_meta)?;

    debug!(
        layers = path.len(),
        wrapper_bytes = wrapper.len(),
        destination = %destination,
        "built onion envelope"
    );

    Ok(OnionEnvelope {
        bytes: wrapper,
        entry: path[0].clone(),
        entry_ephemeral_pub: next_ephemeral,
    })
}

/// Onion request builder over a directory snapshot.
///
/// The service-node list is only mutated through [`OnionBuilder::set_nodes`];
/// `build` clones the snapshot up front, so a concurrent refresh is observed
/// either entirely before or entirely after a given build.
#[derive(Debug)]
pub struct OnionBuilder {
    nodes: RwLock<Vec<ServiceNode>>,
    path_length: usize,
}

impl OnionBuilder {
    pub fn new(path_length: usize) -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            path_length,
        }
    }

    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Replaces the candidate service-node list.
    pub fn set_nodes(&self, nodes: Vec<ServiceNode>) {
        let mut guard = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        *guard = nodes;
    }

    pub fn node_count(&self) -> usize {
        self.nodes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Selects a fresh path and builds an envelope using the OS RNG.
    pub fn build(
        &self,
        payload: &serde_json::Value,
        destination: &Destination,
    ) -> Result<OnionEnvelope, BuildError> {
        self.build_with_rng(payload, destination, &mut OsRng)
    }

    /// Same as [`OnionBuilder::build`] with an injected randomness source.
    pub fn build_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        payload: &serde_json::Value,
        destination: &Destination,
        rng: &mut R,
    ) -> Result<OnionEnvelope, BuildError> {
        let snapshot = self
            .nodes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let path = select_path(&snapshot, self.path_length, rng)?;
        build_with_path(payload, destination, &path, rng)
    }
}
