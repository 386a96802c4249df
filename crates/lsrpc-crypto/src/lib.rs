#![deny(unsafe_code)]
#![warn(clippy::all)]

//! Per-hop cryptography for onion requests: X25519 agreement, the
//! storage-server key schedule, and AES-256-GCM layer sealing.

pub mod cipher;
pub mod keypair;

pub use cipher::*;
pub use keypair::*;
