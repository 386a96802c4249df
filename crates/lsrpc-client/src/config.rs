use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seed directory endpoints queried in order when refreshing the
/// service-node list.
pub const DEFAULT_SEED_NODES: [&str; 3] = [
    "https://seed1.getsession.org/json_rpc",
    "https://seed2.getsession.org/json_rpc",
    "https://seed3.getsession.org/json_rpc",
];

/// Diagnostics profile. `Dev` is chatty; `Prod` silences everything below
/// warnings and tightens the TLS policy (see [`ClientConfig::validate`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Dev,
    Prod,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Dev
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Hops per onion path.
    pub path_length: usize,
    /// Per-HTTP-request timeout for both directory and transport calls.
    pub timeout_ms: u64,
    /// Verify entry-hop TLS certificates. Off by default because service
    /// nodes present self-signed certificates in development deployments.
    pub tls_verify: bool,
    pub log_level: LogLevel,
    pub seed_nodes: Vec<String>,
    /// Passes over the seed list before giving up.
    pub directory_rounds: u32,
    /// Pause between seed-list passes.
    pub directory_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            path_length: 3,
            timeout_ms: 10_000,
            tls_verify: false,
            log_level: LogLevel::Dev,
            seed_nodes: DEFAULT_SEED_NODES.iter().map(|s| s.to_string()).collect(),
            directory_rounds: 5,
            directory_backoff_ms: 10_000,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn directory_backoff(&self) -> Duration {
        Duration::from_millis(self.directory_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.path_length == 0 {
            return Err("path_length must be at least 1".into());
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be > 0".into());
        }
        if self.seed_nodes.is_empty() {
            return Err("seed_nodes must not be empty".into());
        }

        // Lax TLS against public-internet hosts is only tolerated in dev.
        if self.log_level == LogLevel::Prod && !self.tls_verify {
            if let Some(seed) = self.seed_nodes.iter().find(|s| is_public_fqdn_url(s)) {
                return Err(format!(
                    "tls_verify=false is not permitted in prod mode with public host {seed}"
                ));
            }
        }

        Ok(())
    }
}

fn is_public_fqdn_url(url: &str) -> bool {
    let after_scheme = url.split("://").nth(1).unwrap_or(url);
    let authority = after_scheme.split('/').next().unwrap_or("");
    let host = authority.split(':').next().unwrap_or("");
    is_public_fqdn(host)
}

/// A hostname that looks like a public-internet FQDN: not an IP literal,
/// not localhost, not an mDNS `.local` name.
fn is_public_fqdn(host: &str) -> bool {
    if host.is_empty() || host == "localhost" {
        return false;
    }
    if host.parse::<std::net::IpAddr>().is_ok() {
        return false;
    }
    if host.ends_with(".local") {
        return false;
    }
    host.contains('.')
}
