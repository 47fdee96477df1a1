//! Integration tests for the HTTP control plane (C7), in the style of
//! `gglib_axum`'s `tests/voice_routes.rs`: build the router with `oneshot`,
//! assert on status code and JSON shape.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio_util::task::TaskTracker;
use tower::ServiceExt;

use relay_core::domain::{CallId, CallStatus, TranscriptTurn};
use relay_core::ports::{
    OutboundCallRequest, OutboundCallResponse, SignedUrlError, SignedUrlFetcher, TelephonyClient,
    TelephonyError,
};
use relay_core::Settings;
use relay_http::adapters::{AtomicMetrics, InMemoryCallRegistry, InMemoryTranscriptStore};
use relay_http::{create_router, RelayContext};

fn test_settings() -> Settings {
    Settings {
        ai_agent_id: "agent-1".into(),
        ai_api_key: "key-1".into(),
        telephony_account_sid: "sid-1".into(),
        telephony_auth_token: "token-1".into(),
        telephony_phone_number: "+15550000000".into(),
        port: 0,
        media_stream_timeout_ms: 300_000,
        max_ai_retries: 3,
        env: None,
    }
}

/// Always succeeds, handing back a fixed call id — stands in for the real
/// `TwilioTelephonyClient` so these tests never make a network call.
struct FakeTelephonyClient {
    fail: bool,
}

#[async_trait]
impl TelephonyClient for FakeTelephonyClient {
    async fn place_call(
        &self,
        request: OutboundCallRequest,
    ) -> Result<OutboundCallResponse, TelephonyError> {
        if !relay_core::domain::is_e164(&request.to) {
            return Err(TelephonyError::Validation(format!(
                "invalid destination: {}",
                request.to
            )));
        }
        if self.fail {
            return Err(TelephonyError::Provider("provider rejected call".into()));
        }
        Ok(OutboundCallResponse {
            call_id: "CA1234567890".into(),
            status: CallStatus::Initiated,
        })
    }
}

struct FakeSignedUrlFetcher;

#[async_trait]
impl SignedUrlFetcher for FakeSignedUrlFetcher {
    async fn fetch_signed_url(&self, _agent_id: &str) -> Result<String, SignedUrlError> {
        Ok("wss://ai.example.com/socket".into())
    }
}

fn test_context(telephony_fail: bool) -> Arc<RelayContext> {
    Arc::new(RelayContext {
        settings: test_settings(),
        registry: Arc::new(InMemoryCallRegistry::new()),
        transcript: Arc::new(InMemoryTranscriptStore::new()),
        metrics: Arc::new(AtomicMetrics::new()),
        telephony_client: Arc::new(FakeTelephonyClient { fail: telephony_fail }),
        signed_url_fetcher: Arc::new(FakeSignedUrlFetcher),
        session_tracker: TaskTracker::new(),
        started_at: Instant::now(),
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|e| panic!("expected valid JSON body: {e}"))
}

#[tokio::test]
async fn root_and_health_return_200_json() {
    let app = create_router(test_context(false));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn metrics_renders_four_prometheus_lines() {
    let app = create_router(test_context(false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().any(|l| l.starts_with("calls_total ")));
    assert!(lines.iter().any(|l| l.starts_with("errors_total ")));
    assert!(lines.iter().any(|l| l.starts_with("active_calls ")));
    assert!(lines.iter().any(|l| l.starts_with("reconnects_total ")));
}

/// S6 — outbound call happy path: 200 with `callSid` present and a 16-hex
/// `reqId`; the markup endpoint echoes that `reqId` back in its `<Stream>`
/// URL.
#[tokio::test]
async fn outbound_call_happy_path_then_twiml_roundtrip() {
    let app = create_router(test_context(false));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/twilio/outbound_call")
                .header("host", "relay.example.com")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"to":"+15551234567"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["callSid"], "CA1234567890");
    let req_id = json["reqId"].as_str().unwrap().to_string();
    assert_eq!(req_id.len(), 16);
    assert!(req_id.bytes().all(|b| b.is_ascii_hexdigit()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/twilio/outbound_twiml?reqId={req_id}"))
                .header("host", "relay.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    assert!(xml.contains(&format!("/media-stream?reqId={req_id}")));
    assert!(xml.contains("wss://relay.example.com"));
}

#[tokio::test]
async fn outbound_call_rejects_invalid_number_without_incrementing_errors() {
    let app = create_router(test_context(false));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/twilio/outbound_call")
                .header("host", "relay.example.com")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"to":"not-a-number"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn outbound_call_provider_failure_returns_500_and_increments_errors() {
    let ctx = test_context(true);
    let app = create_router(ctx.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/twilio/outbound_call")
                .header("host", "relay.example.com")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"to":"+15551234567"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let metrics_body = ctx.metrics.render();
    assert!(metrics_body.contains("errors_total 1"));
}

/// Invariant 5 — transcript round-trip.
#[tokio::test]
async fn transcript_round_trips_through_the_read_endpoint() {
    let ctx = test_context(false);
    let call_id = CallId::new("CA_transcript_test");
    ctx.transcript
        .append(
            &call_id,
            TranscriptTurn {
                role: relay_core::domain::Role::User,
                text: "hello".into(),
                timestamp: chrono::Utc::now(),
            },
        )
        .await;
    ctx.transcript
        .append(
            &call_id,
            TranscriptTurn {
                role: relay_core::domain::Role::Agent,
                text: "hi there".into(),
                timestamp: chrono::Utc::now(),
            },
        )
        .await;

    let app = create_router(ctx);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/transcripts/CA_transcript_test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["callSid"], "CA_transcript_test");
    let turns = json["transcript"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["text"], "hello");
    assert_eq!(turns[1]["text"], "hi there");
}

/// Invariant 6 — idempotence: a repeated terminal `call_status` for the
/// same `CallSid` never drives `active_calls` below zero.
#[tokio::test]
async fn repeated_terminal_call_status_is_idempotent() {
    let ctx = test_context(false);
    ctx.metrics.inc_active_calls();
    let app = create_router(ctx.clone());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/twilio/call_status")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("CallSid=CA1&CallStatus=completed"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let metrics_body = ctx.metrics.render();
    assert!(metrics_body.contains("active_calls 0"));
}
