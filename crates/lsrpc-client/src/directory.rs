use crate::ClientConfig;
use lsrpc_types::{DirectoryError, ServiceNode};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the seed-node JSON-RPC directory. Seeds are tried in order;
/// the first successful response wins. The whole list is retried up to
/// `rounds` times with a pause between passes.
#[derive(Debug)]
pub struct DirectoryClient {
    http: Client,
    seeds: Vec<String>,
    rounds: u32,
    backoff: Duration,
}

impl DirectoryClient {
    pub fn new(seeds: Vec<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build directory http client");

        Self {
            http,
            seeds,
            rounds: 5,
            backoff: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.seed_nodes.clone(), config.timeout())
            .with_retry(config.directory_rounds, config.directory_backoff())
    }

    pub fn with_retry(mut self, rounds: u32, backoff: Duration) -> Self {
        self.rounds = rounds.max(1);
        self.backoff = backoff;
        self
    }

    /// Fetches up to `limit` service nodes from the first seed that answers.
    pub async fn fetch(&self, limit: usize) -> Result<Vec<ServiceNode>, DirectoryError> {
        for round in 0..self.rounds {
            if round > 0 {
                debug!(round, "seed list exhausted, backing off before retry");
                tokio::time::sleep(self.backoff).await;
            }

            for seed in &self.seeds {
                match self.fetch_from_seed(seed, limit).await {
                    Ok(nodes) => {
                        info!(seed = %seed, count = nodes.len(), "fetched service-node list");
                        return Ok(nodes);
                    }
                    Err(e) => warn!(seed = %seed, error = %e, "seed query failed"),
                }
            }
        }

        Err(DirectoryError::Exhausted)
    }

    async fn fetch_from_seed(
        &self,
        seed: &str,
        limit: usize,
    ) -> Result<Vec<ServiceNode>, DirectoryError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "get_n_service_nodes",
            "params": {
                "limit": limit,
                "fields": {
                    "public_ip": true,
                    "storage_port": true,
                    "pubkey_x25519": true,
                    "pubkey_ed25519": true,
                    "storage_lmq_port": true,
                    "swarm_id": true,
                },
            },
        });

        let response = self
            .http
            .post(seed)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::HttpStatus(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DirectoryError::Parse(e.to_string()))?;

        let states = body
            .get("result")
            .and_then(|r| r.get("service_node_states"))
            .and_then(|s| s.as_array())
            .ok_or_else(|| DirectoryError::Parse("missing result.service_node_states".into()))?;

        let mut nodes = Vec::with_capacity(states.len());
        for row in states {
            match serde_json::from_value::<ServiceNode>(row.clone()) {
                Ok(node) => nodes.push(node),
                Err(e) => debug!(error = %e, "skipping malformed service-node row"),
            }
        }
        Ok(nodes)
    }
}

fn classify(e: reqwest::Error) -> DirectoryError {
    if e.is_timeout() {
        DirectoryError::Timeout
    } else {
        DirectoryError::Request(e.to_string())
    }
}
