use crate::ClientConfig;
use lsrpc_onion::OnionEnvelope;
use lsrpc_types::{OnionResponse, PathHop, TransportError};
use reqwest::Client;
use tokio::sync::watch;
use tracing::debug;

/// Delivers an assembled envelope to its entry hop. One fresh TLS
/// connection per request; paths rotate per request, so nothing is pooled.
#[derive(Debug)]
pub struct Transport {
    http: Client,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .danger_accept_invalid_certs(!config.tls_verify)
            .pool_max_idle_per_host(0)
            .build()
            .expect("failed to build transport http client");

        Self { http }
    }

    fn url_for(entry: &PathHop) -> String {
        format!("https://{}:{}/onion_req/v2", entry.ip, entry.port)
    }

    /// POSTs the wrapper bytes and surfaces the entry hop's response
    /// verbatim. Non-2xx statuses are errors; the body is not decrypted.
    pub async fn send(&self, envelope: &OnionEnvelope) -> Result<OnionResponse, TransportError> {
        let url = Self::url_for(&envelope.entry);
        debug!(url = %url, bytes = envelope.bytes.len(), "posting onion envelope");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(envelope.bytes.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        if !(200..300).contains(&status) {
            debug!(status, body_len = body.len(), "entry hop returned error status");
            return Err(TransportError::HttpStatus(status));
        }

        Ok(OnionResponse {
            status,
            headers,
            body,
        })
    }

    /// Like [`Transport::send`], racing the request against a cancellation
    /// signal. Flipping the watch value to `true` aborts the in-flight
    /// request and yields [`TransportError::Cancelled`].
    pub async fn send_cancellable(
        &self,
        envelope: &OnionEnvelope,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<OnionResponse, TransportError> {
        if *cancel.borrow() {
            return Err(TransportError::Cancelled);
        }

        tokio::select! {
            result = self.send(envelope) => result,
            _ = cancelled(cancel) => Err(TransportError::Cancelled),
        }
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    while rx.changed().await.is_ok() {
        if *rx.borrow() {
            return;
        }
    }
    // Sender dropped without cancelling: never resolve.
    std::future::pending::<()>().await
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        return TransportError::Timeout;
    }
    if e.is_connect() {
        let message = e.to_string();
        if message.contains("certificate") || message.contains("tls") || message.contains("handshake")
        {
            return TransportError::Tls(message);
        }
        return TransportError::Connect(message);
    }
    TransportError::Io(e.to_string())
}
