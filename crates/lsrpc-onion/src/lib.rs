#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Onion envelope construction: the length-prefixed layer container, path
//! selection over the service-node directory, and the outside-in builder
//! that seals one AES-GCM layer per hop.

pub mod builder;
pub mod frame;
pub mod path;
pub mod routing;

pub use builder::*;
pub use frame::*;
pub use path::*;
pub use routing::*;
