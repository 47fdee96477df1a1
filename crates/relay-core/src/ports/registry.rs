//! Call Registry port (C3, `spec.md` §4.3).

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{CallContext, CallId, RequestId};

/// Concurrency-safe `requestId → CallContext` mapping.
///
/// `put`/`get`/`forget` are the hot path (one per call); `sweep` runs
/// hourly from a background task started in `bootstrap` (`spec.md` §4.3).
#[async_trait]
pub trait CallRegistry: Send + Sync {
    async fn put(&self, context: CallContext);
    async fn get(&self, request_id: &RequestId) -> Option<CallContext>;
    /// Attach the telephony-assigned call id once the call has been placed.
    async fn set_call_id(&self, request_id: &RequestId, call_id: CallId);
    /// Remove the entry whose `call_id` matches, per `spec.md` §4.3's
    /// `forget(callId)` operation. The registry is keyed by `RequestId`, so
    /// this is a scan over the (small, TTL-bounded) live set rather than a
    /// second index — called once per call teardown, not per frame.
    async fn forget_by_call_id(&self, call_id: &CallId);
    /// Remove entries older than `older_than` (24h per `spec.md` §4.3).
    async fn sweep(&self, older_than: Duration);
}
