use thiserror::Error;

/// Failures in per-hop authenticated encryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("ciphertext too short: {0} bytes, need at least 28")]
    Short(usize),

    #[error("authentication tag verification failed")]
    Auth,

    #[error("rng failure: {0}")]
    Rng(String),

    #[error("cipher backend error: {0}")]
    Backend(String),
}

/// Failures decoding the length-prefixed layer container.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame truncated: need {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("frame too large: {0} bytes")]
    TooLarge(usize),
}

/// Failures selecting an onion path from the candidate list.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("path length must be at least 1")]
    ZeroLength,

    #[error("insufficient candidates: need {need}, got {got}")]
    Insufficient { need: usize, got: usize },
}

/// Failures assembling an onion envelope.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("json encoding failed: {0}")]
    JsonEncode(#[from] serde_json::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Failures refreshing the service-node list from seed nodes.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("seed returned http status {0}")]
    HttpStatus(u16),

    #[error("seed response parse failure: {0}")]
    Parse(String),

    #[error("seed request timed out")]
    Timeout,

    #[error("seed request failed: {0}")]
    Request(String),

    #[error("all seed nodes exhausted")]
    Exhausted,
}

/// Failures delivering an envelope to the entry hop.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connect failure: {0}")]
    Connect(String),

    #[error("tls failure: {0}")]
    Tls(String),

    #[error("entry hop returned http status {0}")]
    HttpStatus(u16),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("io failure: {0}")]
    Io(String),
}

/// Failures parsing key material from its hex form.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid hex encoding: {0}")]
    Hex(String),

    #[error("invalid key length: {got} bytes, expected {expected}")]
    Length { got: usize, expected: usize },
}
