//! `GET /transcripts/:callSid` — reads the full transcript for a call
//! (`spec.md` §4.4, §6, §8 invariant 5).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use relay_core::domain::{CallId, TranscriptTurn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    call_sid: String,
    transcript: Vec<TranscriptTurn>,
}

pub async fn get_transcript(
    State(state): State<AppState>,
    Path(call_sid): Path<String>,
) -> Json<TranscriptResponse> {
    let call_id = CallId::new(call_sid.clone());
    let transcript = state.transcript.read(&call_id).await;
    Json(TranscriptResponse {
        call_sid,
        transcript,
    })
}
