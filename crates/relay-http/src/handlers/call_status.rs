//! `POST /twilio/call_status` — the telephony provider's call-progress
//! webhook (`spec.md` §4.2, §6, §8 invariant 6).

use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use relay_core::domain::{CallId, CallStatus};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallStatusBody {
    #[serde(rename = "CallSid")]
    call_sid: String,
    #[serde(rename = "CallStatus")]
    call_status: CallStatus,
}

#[derive(Debug, Serialize)]
pub struct CallStatusResponse {
    status: &'static str,
}

/// A repeated terminal callback for the same `CallSid` is harmless:
/// `forget_by_call_id` on an absent entry is a no-op, and the metrics
/// adapter floors `active_calls` at zero on decrement (`spec.md` §8
/// invariant 6).
pub async fn call_status(
    State(state): State<AppState>,
    Form(body): Form<CallStatusBody>,
) -> Json<CallStatusResponse> {
    debug!(call_sid = %body.call_sid, status = ?body.call_status, "call status callback");

    if body.call_status.is_terminal() {
        let call_id = CallId::new(body.call_sid);
        state.registry.forget_by_call_id(&call_id).await;
        state.metrics.dec_active_calls();
    }

    Json(CallStatusResponse { status: "received" })
}
