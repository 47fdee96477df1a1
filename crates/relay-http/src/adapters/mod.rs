//! Concrete implementations of `relay_core::ports` and `relay_bridge::peer`.
//!
//! `metrics`/`registry`/`transcript_store`/`signed_url_client`/
//! `telephony_client` implement the C1–C5 port traits from `relay-core`.
//! `ai_peer` and `telephony_peer` implement `relay-bridge`'s transport
//! traits: one over an outbound `tokio-tungstenite` client connection (the
//! AI peer), one over an upgraded `axum` WebSocket (the telephony peer) —
//! mirroring how `gglib-hf`'s `DefaultHfClient` and
//! `handlers::voice_ws::handle_audio_ws` each sit on one side of a port
//! boundary the core crate never imports directly.

pub mod ai_peer;
pub mod metrics;
pub mod registry;
pub mod signed_url_client;
pub mod telephony_client;
pub mod telephony_peer;
pub mod transcript_store;

pub use ai_peer::{ElevenLabsAiConnector, TungsteniteAiPeer};
pub use metrics::AtomicMetrics;
pub use registry::InMemoryCallRegistry;
pub use signed_url_client::ElevenLabsSignedUrlClient;
pub use telephony_client::TwilioTelephonyClient;
pub use telephony_peer::AxumTelephonyPeer;
pub use transcript_store::InMemoryTranscriptStore;
