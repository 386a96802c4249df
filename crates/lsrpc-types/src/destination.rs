use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheme the terminal hop uses for the outbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// The terminal HTTP target an onion request is delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub target: String,
}

impl Destination {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        protocol: Protocol,
        target: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
            target: target.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".into());
        }
        if self.port == 0 {
            return Err("port must be in 1..=65535".into());
        }
        if !self.target.starts_with('/') {
            return Err("target must begin with '/'".into());
        }
        Ok(())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.protocol, self.host, self.port, self.target
        )
    }
}
