//! Axum handlers for the HTTP control plane (C7, `spec.md` §6).
//!
//! Handlers are thin — each does request parsing/validation and delegates
//! to the port trait objects in `AppState`, the way `gglib_axum`'s handlers
//! delegate to `GuiBackend` rather than touching a database directly.

pub mod call_status;
pub mod health;
pub mod media_stream;
pub mod metrics;
pub mod outbound_call;
pub mod transcripts;
pub mod twiml;

/// Host header, taken verbatim, drives both the markup's `wss://` callback
/// and the status/markup callback URLs this service hands to the telephony
/// provider — `spec.md` §6: "Host must match the inbound request's host".
pub(crate) fn host_header(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost")
        .to_string()
}

/// `wss` unless the host is loopback, in which case `ws` (`spec.md` §6).
pub(crate) fn ws_scheme(host: &str) -> &'static str {
    if is_loopback_host(host) {
        "ws"
    } else {
        "wss"
    }
}

/// `https` unless the host is loopback, in which case `http` — used for the
/// markup/status callback URLs handed to the telephony provider (distinct
/// from the WebSocket scheme above, but the same loopback rule applies).
pub(crate) fn http_scheme(host: &str) -> &'static str {
    if is_loopback_host(host) {
        "http"
    } else {
        "https"
    }
}

fn is_loopback_host(host: &str) -> bool {
    let without_port = host.split(':').next().unwrap_or(host);
    without_port == "localhost" || without_port == "127.0.0.1" || without_port == "::1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_hosts_use_plaintext_schemes() {
        assert_eq!(ws_scheme("localhost:8000"), "ws");
        assert_eq!(http_scheme("127.0.0.1:8000"), "http");
    }

    #[test]
    fn non_loopback_hosts_use_tls_schemes() {
        assert_eq!(ws_scheme("relay.example.com"), "wss");
        assert_eq!(http_scheme("relay.example.com"), "https");
    }
}
