//! Route definitions and router construction (C7, `spec.md` §6).

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// CORS is wide open — the control plane has no authentication layer
/// (`spec.md` §1 Non-goals: "authentication of the control-plane HTTP
/// surface"), so there is no origin to restrict against.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full router: every endpoint in `spec.md` §6, plus the
/// `/media-stream` WebSocket upgrade.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/transcripts/{callSid}", get(handlers::transcripts::get_transcript))
        .route("/twilio/outbound_call", post(handlers::outbound_call::outbound_call))
        .route("/twilio/outbound_twiml", post(handlers::twiml::outbound_twiml))
        .route("/twilio/call_status", post(handlers::call_status::call_status))
        .route("/media-stream", get(handlers::media_stream::media_stream))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
