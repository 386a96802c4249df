use crate::{ClientConfig, DirectoryClient, LogLevel, Transport};
use lsrpc_onion::OnionBuilder;
use lsrpc_types::{
    BuildError, Destination, DirectoryError, OnionResponse, ServiceNode, TransportError,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

/// Facade-level error: everything a full request round can fail with.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One-call onion request client: directory refresh, envelope construction,
/// and entry-hop delivery behind a single handle. The node list lives in
/// the builder; everything else here is immutable after construction.
#[derive(Debug)]
pub struct OnionClient {
    config: ClientConfig,
    builder: OnionBuilder,
    directory: DirectoryClient,
    transport: Transport,
}

impl OnionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate().map_err(ClientError::Config)?;

        let builder = OnionBuilder::new(config.path_length);
        let directory = DirectoryClient::from_config(&config);
        let transport = Transport::new(&config);

        Ok(Self {
            config,
            builder,
            directory,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the candidate list directly, bypassing the directory.
    pub fn set_nodes(&self, nodes: Vec<ServiceNode>) {
        self.builder.set_nodes(nodes);
    }

    pub fn node_count(&self) -> usize {
        self.builder.node_count()
    }

    /// Pulls a fresh service-node list from the seeds into the builder.
    pub async fn refresh_nodes(&self, limit: usize) -> Result<usize, ClientError> {
        let nodes = self.directory.fetch(limit).await?;
        let count = nodes.len();
        self.builder.set_nodes(nodes);
        info!(count, "refreshed service-node list");
        Ok(count)
    }

    /// Builds an envelope over a freshly selected path and delivers it.
    pub async fn send_request(
        &self,
        payload: &serde_json::Value,
        destination: &Destination,
    ) -> Result<OnionResponse, ClientError> {
        let envelope = self.builder.build(payload, destination)?;
        Ok(self.transport.send(&envelope).await?)
    }

    /// Like [`OnionClient::send_request`], racing delivery against a
    /// cancellation signal.
    pub async fn send_request_cancellable(
        &self,
        payload: &serde_json::Value,
        destination: &Destination,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<OnionResponse, ClientError> {
        let envelope = self.builder.build(payload, destination)?;
        Ok(self.transport.send_cancellable(&envelope, cancel).await?)
    }
}

pub struct OnionClientBuilder {
    config: ClientConfig,
}

impl OnionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn path_length(mut self, length: usize) -> Self {
        self.config.path_length = length;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    pub fn tls_verify(mut self, verify: bool) -> Self {
        self.config.tls_verify = verify;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn seed_nodes(mut self, seeds: Vec<String>) -> Self {
        self.config.seed_nodes = seeds;
        self
    }

    pub fn build(self) -> Result<OnionClient, ClientError> {
        OnionClient::new(self.config)
    }
}

impl Default for OnionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
