//! Core domain types: call identifiers, call context, and transcripts.
//!
//! These are pure data types — no locking, no I/O. `relay-http` owns the
//! concurrency-safe containers (`CallRegistry`, `TranscriptStore`) that
//! hold them.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Opaque 16-hex-character identifier minted for one outbound-call request.
///
/// Carried through the HTTP→markup→WebSocket hop (`spec.md` §9) as the only
/// link between the control-plane call-creation request and the later
/// WebSocket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Mint a fresh, random 16-hex-character id.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse an id received from a query string or path segment.
    ///
    /// Validates the 16-hex-char shape rather than accepting it verbatim —
    /// the registry lookup key must never silently diverge in length or
    /// case from what `generate()` produces.
    pub fn parse(raw: &str) -> Result<Self, InvalidRequestId> {
        if raw.len() == 16 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidRequestId(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid request id: {0:?} (expected 16 hex characters)")]
pub struct InvalidRequestId(String);

/// Telephony-provider call identifier, opaque to this service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(String);

impl CallId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-call context stored by the Call Registry (C3), keyed by `RequestId`.
///
/// Created at outbound-call creation; all of `script`/`persona`/`context`
/// are opaque strings passed verbatim to the AI peer at session start.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub request_id: RequestId,
    pub call_id: Option<CallId>,
    pub script: Option<String>,
    pub persona: Option<String>,
    pub context: Option<String>,
    /// Monotonic creation instant, used by the TTL sweep (`spec.md` §4.3).
    pub created_at: Instant,
    /// Wall-clock creation time, for anything rendered to JSON.
    pub created_at_utc: DateTime<Utc>,
}

impl CallContext {
    #[must_use]
    pub fn new(
        request_id: RequestId,
        script: Option<String>,
        persona: Option<String>,
        context: Option<String>,
    ) -> Self {
        Self {
            request_id,
            call_id: None,
            script,
            persona,
            context,
            created_at: Instant::now(),
            created_at_utc: Utc::now(),
        }
    }

    /// True if none of the optional AI-session fields are populated — the
    /// init frame to the AI peer is omitted entirely in that case
    /// (`spec.md` §4.6, "Protocol to the AI peer (outbound framing)").
    #[must_use]
    pub fn has_init_fields(&self) -> bool {
        self.script.is_some() || self.persona.is_some() || self.context.is_some()
    }
}

/// A single transcript turn, appended as the AI peer reports `user_transcript`
/// or `agent_response` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// Telephony-provider call-progress statuses reported on the status callback
/// (`spec.md` §4.2). Kept as an open string match plus a terminal-status
/// predicate, since providers are free to add statuses this service doesn't
/// need to special-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Initiated,
    Ringing,
    Answered,
    Completed,
    Busy,
    #[serde(rename = "no-answer")]
    NoAnswer,
    Failed,
    Canceled,
    /// Any other status value reported by the provider.
    #[serde(other)]
    Other,
}

impl CallStatus {
    /// Terminal statuses release the call's registry entry and decrement
    /// `active_calls` (`spec.md` §6, §8 invariant 6).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed
                | CallStatus::Busy
                | CallStatus::NoAnswer
                | CallStatus::Failed
                | CallStatus::Canceled
        )
    }
}

/// E.164-ish phone number validation regex, compiled once.
///
/// `^\+?[1-9]\d{1,14}$` per `spec.md` §4.2.
static E164: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap());

#[must_use]
pub fn is_e164(candidate: &str) -> bool {
    E164.is_match(candidate)
}
