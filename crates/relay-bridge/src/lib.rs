//! The per-call bridge session (C6) — the core of the voice-call relay.
//!
//! [`session::BridgeSession`] owns the lifecycle of one telephony WebSocket
//! paired with one (reconnectable) AI WebSocket. It is transport-agnostic:
//! it drives the [`peer::TelephonyPeer`] / [`peer::AiPeer`] /
//! [`peer::AiConnector`] traits rather than `axum::extract::ws` or
//! `tokio-tungstenite` directly, the way `gglib-voice::pipeline` drives the
//! `SttBackend`/`TtsBackend` traits instead of talking to whisper.cpp or
//! Kokoro directly. `relay-http` supplies the real adapters; tests in this
//! crate supply channel-backed fakes.

pub mod frames;
pub mod peer;
pub mod reconnect;
pub mod session;

pub use session::{BridgeSession, SessionConfig, SessionOutcome, SessionState};
