//! Domain types and port definitions for the voice-call relay.
//!
//! This crate has no infrastructure dependencies (no `axum`, no `reqwest`,
//! no `tokio-tungstenite`). It defines the shapes every adapter agrees on:
//! the call context, the transcript, the settings loaded from the
//! environment, and the `ports` traits that `relay-http` and `relay-bridge`
//! implement or consume.

pub mod domain;
pub mod ports;
pub mod settings;

pub use domain::{CallId, CallStatus, RequestId, Role, TranscriptTurn};
pub use settings::Settings;
