//! HTTP control plane and WebSocket adapters for the voice-call relay.
//!
//! This crate is the infrastructure layer: it implements the `relay_core`
//! port traits against real backends (`reqwest`, in-memory maps,
//! `tokio-tungstenite`) and wires an `axum` router on top, the way
//! `gglib-axum` implements `gglib_core`'s ports against its own database and
//! process-runner backends. `relay_bridge::BridgeSession` is transport
//! agnostic; this crate is where it meets `axum::extract::ws` on one side
//! and a `tokio-tungstenite` client on the other.

pub mod adapters;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{bootstrap, RelayContext};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
