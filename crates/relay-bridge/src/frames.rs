//! Wire frame shapes for both peers.
//!
//! Telephony frames are tagged on `event`; AI frames are tagged on `type`,
//! exactly per `spec.md` §4.6. Each `*_event`/`*_client_data` nesting below
//! mirrors the literal JSON shapes named there, so the S1–S5 scenario
//! tests in `session.rs` can assert against these types directly instead
//! of raw `serde_json::Value` poking.

use serde::{Deserialize, Serialize};

// ───────────────────────── Telephony → relay (inbound) ─────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyInboundFrame {
    Start { start: StreamStart },
    Media { media: MediaPayload },
    Stop,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamStart {
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaPayload {
    pub payload: String,
}

// ───────────────────────── relay → Telephony (outbound) ────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyOutboundFrame {
    Media {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        media: MediaPayload,
    },
    Clear {
        #[serde(rename = "streamSid")]
        stream_sid: String,
    },
}

// ───────────────────────── AI → relay (inbound) ─────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum AiInboundFrame {
    #[serde(rename = "conversation_initiation_metadata")]
    ConversationInitiationMetadata,

    #[serde(rename = "audio")]
    Audio { audio_event: AudioEvent },

    #[serde(rename = "interruption")]
    Interruption,

    #[serde(rename = "ping")]
    Ping { ping_event: PingEvent },

    #[serde(rename = "user_transcript")]
    UserTranscript {
        user_transcription_event: UserTranscriptionEvent,
    },

    #[serde(rename = "agent_response")]
    AgentResponse {
        agent_response_event: AgentResponseEvent,
    },

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioEvent {
    pub audio_base_64: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingEvent {
    pub event_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserTranscriptionEvent {
    pub user_transcript: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentResponseEvent {
    pub agent_response: String,
}

// ───────────────────────── relay → AI (outbound) ────────────────────────────
//
// The three outbound shapes disagree on whether a `type` tag is present at
// all (`user_audio_chunk` has none), so this can't be one internally-tagged
// enum the way the inbound frames are. Each shape gets its own struct and
// the enum is `#[serde(untagged)]` over them.

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationInitiationClientData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitFrame {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub conversation_initiation_client_data: ConversationInitiationClientData,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAudioChunkFrame {
    pub user_audio_chunk: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongFrame {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AiOutboundFrame {
    Init(InitFrame),
    UserAudioChunk(UserAudioChunkFrame),
    Pong(PongFrame),
}

impl AiOutboundFrame {
    #[must_use]
    pub fn init(data: ConversationInitiationClientData) -> Self {
        Self::Init(InitFrame {
            kind: "conversation_initiation_client_data",
            conversation_initiation_client_data: data,
        })
    }

    #[must_use]
    pub fn user_audio_chunk(payload: impl Into<String>) -> Self {
        Self::UserAudioChunk(UserAudioChunkFrame {
            user_audio_chunk: payload.into(),
        })
    }

    #[must_use]
    pub fn pong(event_id: impl Into<String>) -> Self {
        Self::Pong(PongFrame {
            kind: "pong",
            event_id: event_id.into(),
        })
    }
}
