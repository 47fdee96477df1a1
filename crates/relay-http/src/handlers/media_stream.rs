//! `GET /media-stream?reqId=<id>` — the telephony peer's WebSocket upgrade;
//! spawns one `BridgeSession` per connection (`spec.md` §4.6, §5).

use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{info, warn};

use relay_bridge::frames::ConversationInitiationClientData;
use relay_bridge::session::{BridgeSession, SessionConfig, SessionOutcome};
use relay_core::domain::{CallId, RequestId};

use crate::adapters::{AxumTelephonyPeer, ElevenLabsAiConnector};
use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MediaStreamQuery {
    #[serde(rename = "reqId")]
    req_id: String,
}

/// Pre-upgrade validation runs as an ordinary handler return so a bad or
/// unknown `reqId` can reply 400/404 — a WebSocket upgrade response has no
/// room left to carry an HTTP error once `on_upgrade` commits to 101.
pub async fn media_stream(
    State(state): State<AppState>,
    Query(query): Query<MediaStreamQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, HttpError> {
    let request_id = RequestId::parse(&query.req_id)
        .map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let context = state
        .registry
        .get(&request_id)
        .await
        .ok_or_else(|| HttpError::NotFound(format!("unknown reqId {request_id}")))?;

    let call_id = context
        .call_id
        .clone()
        .unwrap_or_else(|| CallId::new(request_id.to_string()));

    let init_data = if context.has_init_fields() {
        ConversationInitiationClientData {
            script: context.script.clone(),
            persona: context.persona.clone(),
            context: context.context.clone(),
        }
    } else {
        ConversationInitiationClientData::default()
    };

    let config = SessionConfig {
        max_ai_retries: state.settings.max_ai_retries,
        idle_timeout: std::time::Duration::from_millis(state.settings.media_stream_timeout_ms),
    };

    let connector = ElevenLabsAiConnector::new(
        state.signed_url_fetcher.clone(),
        state.settings.ai_agent_id.clone(),
    );
    let transcript = state.transcript.clone();
    let metrics = state.metrics.clone();
    let registry = state.registry.clone();
    let tracker = state.session_tracker.clone();

    Ok(ws.on_upgrade(move |socket| async move {
        // Tracked by `session_tracker` rather than driven inline, so the
        // supervisor's graceful shutdown (`spec.md` §5) can wait on every
        // in-flight call instead of only on the ones it happens to await
        // directly.
        let handle = tracker.spawn(async move {
            let telephony = AxumTelephonyPeer::new(socket);
            let session =
                BridgeSession::new(call_id.clone(), init_data, transcript, metrics, config);

            info!(call_id = %call_id, "bridge session starting");
            let outcome = session.run(telephony, connector).await;
            match outcome {
                SessionOutcome::TelephonyClosed => {
                    info!(call_id = %call_id, "bridge session ended: telephony closed")
                }
                SessionOutcome::ReconnectExhausted => {
                    warn!(call_id = %call_id, "bridge session ended: AI reconnect budget exhausted")
                }
                SessionOutcome::IdleTimeout => {
                    info!(call_id = %call_id, "bridge session ended: idle timeout")
                }
            }
            registry.forget_by_call_id(&call_id).await;
        });
        let _ = handle.await;
    }))
}
