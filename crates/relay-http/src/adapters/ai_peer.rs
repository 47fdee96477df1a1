//! AI-peer WebSocket adapter: an outbound `tokio-tungstenite` client
//! connection to the conversational-AI provider.
//!
//! `axum::extract::ws` only does server-side upgrades, so the AI peer (which
//! this service *dials out to*) needs its own client stack — the same
//! reason the retrieval pack's other outbound-WS client (`zouwei-moraya`)
//! reaches for `tokio-tungstenite` instead of axum.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::warn;

use relay_bridge::frames::{AiInboundFrame, AiOutboundFrame};
use relay_bridge::peer::{AiConnector, AiPeer, ConnectError, FrameError, RecvResult, SendError};
use relay_core::ports::SignedUrlFetcher;
use std::sync::Arc;

/// One live AI WebSocket connection. Replaced wholesale on reconnect —
/// `ElevenLabsAiConnector::connect` returns a fresh instance rather than
/// this type offering a `reconnect()` method.
pub struct TungsteniteAiPeer {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

#[async_trait]
impl AiPeer for TungsteniteAiPeer {
    async fn recv(&mut self) -> RecvResult<AiInboundFrame> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Some(
                        serde_json::from_str(text.as_str())
                            .map_err(|e| FrameError::MalformedJson(e.to_string())),
                    );
                }
                // tokio-tungstenite does not auto-answer transport-level
                // pings on a raw client stream; reply here so the provider's
                // keepalive doesn't time out the connection out from under
                // us. Distinct from the app-level `{"type":"ping"}` JSON
                // frame `BridgeSession` answers with a `pong` frame.
                Some(Ok(Message::Ping(payload))) => {
                    if let Err(e) = self.stream.send(Message::Pong(payload)).await {
                        warn!(error = %e, "failed replying to AI websocket ping");
                        return None;
                    }
                }
                Some(Ok(Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Binary(_))) => {
                    warn!("unexpected binary frame from AI peer, ignoring");
                }
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Err(e)) => {
                    warn!(error = %e, "AI websocket read error");
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, frame: AiOutboundFrame) -> Result<(), SendError> {
        let text = serde_json::to_string(&frame).map_err(|e| SendError::Failed(e.to_string()))?;
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| SendError::Failed(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Fetches a signed URL, then dials the AI WebSocket. Used as the single
/// reconnect unit `spec.md` §5 describes ("repeat from fetching a fresh
/// signed URL").
pub struct ElevenLabsAiConnector {
    signed_url_fetcher: Arc<dyn SignedUrlFetcher>,
    agent_id: String,
}

impl ElevenLabsAiConnector {
    #[must_use]
    pub fn new(signed_url_fetcher: Arc<dyn SignedUrlFetcher>, agent_id: String) -> Self {
        Self {
            signed_url_fetcher,
            agent_id,
        }
    }
}

#[async_trait]
impl AiConnector for ElevenLabsAiConnector {
    type Peer = TungsteniteAiPeer;

    async fn connect(&self) -> Result<Self::Peer, ConnectError> {
        let url = self
            .signed_url_fetcher
            .fetch_signed_url(&self.agent_id)
            .await
            .map_err(|e| ConnectError(e.to_string()))?;

        let (stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| ConnectError(e.to_string()))?;

        Ok(TungsteniteAiPeer { stream })
    }
}
