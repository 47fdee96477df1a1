//! Signed-URL Fetcher (C1) adapter: a `reqwest::Client`-backed
//! `SignedUrlFetcher`, mirroring the shape of `gglib-hf`'s `ReqwestBackend`
//! minus its retry loop — `spec.md` §4.1 is explicit that this fetch must
//! fail without retry, since `relay-bridge::BridgeSession` owns the
//! reconnect/backoff policy that wraps it.
//!
//! Open question (`spec.md` §9, resolved in `DESIGN.md`): GET with query
//! parameters, accepting either `signed_url` or `url` in the JSON body,
//! preferring `signed_url`.

use async_trait::async_trait;
use relay_core::ports::{SignedUrlError, SignedUrlFetcher};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    signed_url: Option<String>,
    url: Option<String>,
}

impl SignedUrlResponse {
    fn into_url(self) -> Result<String, SignedUrlError> {
        self.signed_url.or(self.url).ok_or_else(|| {
            SignedUrlError::Parse("response body had neither signed_url nor url".to_string())
        })
    }
}

pub struct ElevenLabsSignedUrlClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsSignedUrlClient {
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            base_url: "https://api.elevenlabs.io/v1/convai/conversation/get-signed-url"
                .to_string(),
            api_key,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SignedUrlFetcher for ElevenLabsSignedUrlClient {
    async fn fetch_signed_url(&self, agent_id: &str) -> Result<String, SignedUrlError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("agent_id", agent_id)])
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| SignedUrlError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SignedUrlError::Auth);
        }
        if !status.is_success() {
            return Err(SignedUrlError::Transport(format!(
                "unexpected status {status}"
            )));
        }

        let parsed: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| SignedUrlError::Parse(e.to_string()))?;
        parsed.into_url()
    }
}
