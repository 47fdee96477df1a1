//! Transport-agnostic peer traits.
//!
//! `BridgeSession` drives these instead of talking to `axum::extract::ws`
//! or `tokio-tungstenite` directly — the same separation
//! `gglib-voice::backend::{SttBackend, TtsBackend}` draws between the
//! pipeline and whatever speech engine is plugged in. `relay-http` supplies
//! the real adapters (an upgraded axum `WebSocket` for the telephony peer,
//! a `tokio-tungstenite` client stream for the AI peer); `relay-bridge`'s
//! own tests supply channel-backed fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::frames::{AiInboundFrame, AiOutboundFrame, TelephonyInboundFrame, TelephonyOutboundFrame};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed JSON frame: {0}")]
    MalformedJson(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("peer send failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
#[error("AI connect failed: {0}")]
pub struct ConnectError(pub String);

/// One received item from a peer: either a successfully parsed frame, a
/// frame that failed to parse (logged and dropped, not fatal — `spec.md`
/// §4.6 "Failure semantics"), or `None` for a closed connection.
pub type RecvResult<F> = Option<Result<F, FrameError>>;

/// The telephony-provider side of the bridge.
#[async_trait]
pub trait TelephonyPeer: Send {
    async fn recv(&mut self) -> RecvResult<TelephonyInboundFrame>;
    async fn send(&mut self, frame: TelephonyOutboundFrame) -> Result<(), SendError>;
    async fn close(&mut self);
}

/// One live connection to the AI peer. Replaced wholesale on reconnect —
/// `BridgeSession` never mutates a connection in place, it drops the old
/// one and obtains a new one via `AiConnector`.
#[async_trait]
pub trait AiPeer: Send {
    async fn recv(&mut self) -> RecvResult<AiInboundFrame>;
    async fn send(&mut self, frame: AiOutboundFrame) -> Result<(), SendError>;
    async fn close(&mut self);
}

/// Fetches a signed URL and opens the AI WebSocket — the two suspension
/// points `spec.md` §5 lists as one reconnect unit ("repeat from fetching
/// a fresh signed URL").
#[async_trait]
pub trait AiConnector: Send {
    type Peer: AiPeer;

    async fn connect(&self) -> Result<Self::Peer, ConnectError>;
}
