//! `POST /twilio/outbound_twiml` — the markup the telephony provider fetches
//! on answer, naming the WebSocket endpoint it should connect to
//! (`spec.md` §6).

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::{host_header, ws_scheme};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TwimlQuery {
    #[serde(rename = "reqId")]
    req_id: String,
}

pub async fn outbound_twiml(
    State(_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TwimlQuery>,
) -> impl IntoResponse {
    let host = host_header(&headers);
    let scheme = ws_scheme(&host);
    let markup = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<Response>\n  <Connect>\n    <Stream url=\"{scheme}://{host}/media-stream?reqId={req_id}\" />\n  </Connect>\n</Response>",
        req_id = query.req_id,
    );
    ([(header::CONTENT_TYPE, "text/xml")], markup)
}
