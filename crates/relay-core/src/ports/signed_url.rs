//! Signed-URL Fetcher port (C1, `spec.md` §4.1).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignedUrlError {
    #[error("transport error reaching AI provider: {0}")]
    Transport(String),

    #[error("AI provider rejected credentials")]
    Auth,

    #[error("AI provider response could not be parsed: {0}")]
    Parse(String),
}

/// Exchanges an agent id + API key for a short-lived signed WebSocket URL.
///
/// Fails without retry (`spec.md` §4.1) — the caller (`relay-bridge`'s
/// `BridgeSession`) owns the reconnect/backoff policy.
#[async_trait]
pub trait SignedUrlFetcher: Send + Sync {
    async fn fetch_signed_url(&self, agent_id: &str) -> Result<String, SignedUrlError>;
}
