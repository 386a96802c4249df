#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Networked half of the onion request client: the seed-node directory,
//! the entry-hop transport, configuration, and the one-call facade.

pub mod client;
pub mod config;
pub mod directory;
pub mod logging;
pub mod transport;

pub use client::*;
pub use config::*;
pub use directory::*;
pub use logging::*;
pub use transport::*;
