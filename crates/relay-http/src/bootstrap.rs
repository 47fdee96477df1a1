//! Composition root — the only place concrete adapters are instantiated.
//!
//! Mirrors `gglib_axum::bootstrap::bootstrap`: one function builds every
//! concrete backend, wires them behind their port trait objects, and
//! returns a context the router and the CLI's supervisor both share.

use std::sync::Arc;
use std::time::{Duration, Instant};

use relay_core::ports::{CallRegistry, MetricsSink, SignedUrlFetcher, TelephonyClient, TranscriptStore};
use relay_core::Settings;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::adapters::{
    AtomicMetrics, ElevenLabsSignedUrlClient, InMemoryCallRegistry, InMemoryTranscriptStore,
    TwilioTelephonyClient,
};
use crate::state::AppState;

/// The hourly TTL sweep interval for the call registry (`spec.md` §4.3).
const REGISTRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Entries older than this are swept regardless of call status.
const REGISTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Everything an axum handler or the CLI supervisor needs: the validated
/// settings, every port trait object, and a tracker for in-flight bridge
/// sessions so graceful shutdown can wait on them (`spec.md` §5).
pub struct RelayContext {
    pub settings: Settings,
    pub registry: Arc<dyn CallRegistry>,
    pub transcript: Arc<dyn TranscriptStore>,
    pub metrics: Arc<dyn MetricsSink>,
    pub telephony_client: Arc<dyn TelephonyClient>,
    pub signed_url_fetcher: Arc<dyn SignedUrlFetcher>,
    /// Tracks every spawned `BridgeSession` task. The supervisor calls
    /// `.close()` then waits on `.wait()` (bounded by a timeout) during
    /// graceful shutdown instead of tracking a raw `JoinSet` by hand.
    pub session_tracker: TaskTracker,
    pub started_at: Instant,
}

/// Build the composition root and start the registry's background sweep.
pub fn bootstrap(settings: Settings) -> AppState {
    let http_client = reqwest::Client::builder()
        .build()
        .expect("reqwest client with default TLS backend must build");

    let registry: Arc<dyn CallRegistry> = Arc::new(InMemoryCallRegistry::new());
    let transcript: Arc<dyn TranscriptStore> = Arc::new(InMemoryTranscriptStore::new());
    let metrics: Arc<dyn MetricsSink> = Arc::new(AtomicMetrics::new());
    let telephony_client: Arc<dyn TelephonyClient> = Arc::new(TwilioTelephonyClient::new(
        http_client.clone(),
        settings.telephony_account_sid.clone(),
        settings.telephony_auth_token.clone(),
    ));
    let signed_url_fetcher: Arc<dyn SignedUrlFetcher> = Arc::new(ElevenLabsSignedUrlClient::new(
        http_client,
        settings.ai_api_key.clone(),
    ));

    let ctx = Arc::new(RelayContext {
        settings,
        registry: registry.clone(),
        transcript,
        metrics,
        telephony_client,
        signed_url_fetcher,
        session_tracker: TaskTracker::new(),
        started_at: Instant::now(),
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REGISTRY_SWEEP_INTERVAL);
        // The first tick fires immediately; skip it so the sweep doesn't
        // race process boot.
        interval.tick().await;
        loop {
            interval.tick().await;
            debug!("running hourly call registry TTL sweep");
            registry.sweep(REGISTRY_TTL).await;
        }
    });

    ctx
}
