//! Port traits: the seams between domain/bridge logic and infrastructure.
//!
//! Mirrors `gglib-core::ports`' role — every trait here is implemented by a
//! concrete adapter in `relay-http`, and consumed by `relay-bridge` or by
//! HTTP handlers without either side knowing about `reqwest`, `axum`, or
//! `tokio-tungstenite` directly.

pub mod metrics;
pub mod registry;
pub mod signed_url;
pub mod telephony;
pub mod transcript;

pub use metrics::MetricsSink;
pub use registry::CallRegistry;
pub use signed_url::{SignedUrlError, SignedUrlFetcher};
pub use telephony::{
    OutboundCallRequest, OutboundCallResponse, TelephonyClient, TelephonyError,
};
pub use transcript::TranscriptStore;
