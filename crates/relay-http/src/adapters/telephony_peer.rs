//! Telephony-peer WebSocket adapter: wraps an upgraded `axum` WebSocket.
//!
//! One `AxumTelephonyPeer` is constructed per `/media-stream` connection and
//! handed to `BridgeSession::run`, which owns it exclusively for the life of
//! the call (`spec.md` §3 invariant 4) — unlike
//! `handlers::voice_ws::handle_audio_ws`, which has to split its socket into
//! two tasks because it ferries raw binary audio both ways concurrently,
//! `BridgeSession` drives one peer at a time from a single `tokio::select!`
//! loop, so the socket stays whole here.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use tracing::warn;

use relay_bridge::frames::{TelephonyInboundFrame, TelephonyOutboundFrame};
use relay_bridge::peer::{FrameError, RecvResult, SendError, TelephonyPeer};

pub struct AxumTelephonyPeer {
    socket: WebSocket,
}

impl AxumTelephonyPeer {
    #[must_use]
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl TelephonyPeer for AxumTelephonyPeer {
    async fn recv(&mut self) -> RecvResult<TelephonyInboundFrame> {
        loop {
            match self.socket.recv().await {
                Some(Ok(Message::Text(text))) => {
                    return Some(
                        serde_json::from_str(text.as_str())
                            .map_err(|e| FrameError::MalformedJson(e.to_string())),
                    );
                }
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_))) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "telephony websocket read error");
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, frame: TelephonyOutboundFrame) -> Result<(), SendError> {
        let text = serde_json::to_string(&frame).map_err(|e| SendError::Failed(e.to_string()))?;
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| SendError::Failed(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.socket.send(Message::Close(None)).await;
    }
}
