//! `POST /twilio/outbound_call` — places an outbound call and mints the
//! `requestId` that links this HTTP request to the later WebSocket
//! connection (`spec.md` §4.2, §6, §9).

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use relay_core::domain::{is_e164, CallContext, CallId, CallStatus, RequestId};
use relay_core::ports::TelephonyError;

use super::{host_header, http_scheme};
use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OutboundCallBody {
    to: String,
    from: Option<String>,
    script: Option<String>,
    persona: Option<String>,
    context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundCallResponse {
    success: bool,
    call_sid: String,
    to: String,
    from: String,
    status: String,
    req_id: String,
    timestamp: chrono::DateTime<Utc>,
}

/// Renders a `CallStatus` the same way it would appear on the wire (its
/// `kebab-case` serde form), for the response body's `status` field.
fn call_status_str(status: &CallStatus) -> String {
    match serde_json::to_value(status) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "unknown".to_string(),
    }
}

pub async fn outbound_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<OutboundCallBody>,
) -> Result<Json<OutboundCallResponse>, HttpError> {
    if !is_e164(&body.to) {
        return Err(HttpError::BadRequest(format!(
            "'to' must be E.164, got {:?}",
            body.to
        )));
    }

    let from = body
        .from
        .clone()
        .unwrap_or_else(|| state.settings.telephony_phone_number.clone());

    let request_id = RequestId::generate();
    let host = host_header(&headers);
    let scheme = http_scheme(&host);
    let markup_url = format!(
        "{scheme}://{host}/twilio/outbound_twiml?reqId={request_id}",
    );
    let status_url = format!("{scheme}://{host}/twilio/call_status");

    let context = CallContext::new(
        request_id.clone(),
        body.script.clone(),
        body.persona.clone(),
        body.context.clone(),
    );
    state.registry.put(context).await;

    let outcome = state
        .telephony_client
        .place_call(relay_core::ports::OutboundCallRequest {
            to: body.to.clone(),
            from: from.clone(),
            markup_url,
            status_url,
        })
        .await;

    let response = match outcome {
        Ok(response) => response,
        Err(TelephonyError::Validation(msg)) => {
            return Err(HttpError::BadRequest(msg));
        }
        Err(err @ (TelephonyError::Transport(_) | TelephonyError::Provider(_))) => {
            warn!(error = %err, "telephony provider rejected outbound call");
            state.metrics.inc_errors_total();
            return Err(HttpError::Internal(err.to_string()));
        }
    };

    state
        .registry
        .set_call_id(&request_id, CallId::new(response.call_id.clone()))
        .await;
    state.metrics.inc_calls_total();
    state.metrics.inc_active_calls();

    Ok(Json(OutboundCallResponse {
        success: true,
        call_sid: response.call_id,
        to: body.to,
        from,
        status: call_status_str(&response.status),
        req_id: request_id.to_string(),
        timestamp: Utc::now(),
    }))
}
