//! In-memory `CallRegistry` (C3), `HashMap` behind a `tokio::sync::RwLock`.
//!
//! Reads (one per WebSocket upgrade) are far more common than writes (one
//! per outbound call), so a reader-writer lock rather than a plain mutex.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use relay_core::domain::{CallContext, CallId, RequestId};
use relay_core::ports::CallRegistry;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCallRegistry {
    entries: RwLock<HashMap<RequestId, CallContext>>,
}

impl InMemoryCallRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CallRegistry for InMemoryCallRegistry {
    async fn put(&self, context: CallContext) {
        let mut entries = self.entries.write().await;
        entries.insert(context.request_id.clone(), context);
    }

    async fn get(&self, request_id: &RequestId) -> Option<CallContext> {
        let entries = self.entries.read().await;
        entries.get(request_id).cloned()
    }

    async fn set_call_id(&self, request_id: &RequestId, call_id: CallId) {
        let mut entries = self.entries.write().await;
        if let Some(context) = entries.get_mut(request_id) {
            context.call_id = Some(call_id);
        }
    }

    async fn forget_by_call_id(&self, call_id: &CallId) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, context| context.call_id.as_ref() != Some(call_id));
    }

    async fn sweep(&self, older_than: Duration) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, context| context.created_at.elapsed() < older_than);
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, "call registry TTL sweep removed stale entries");
        }
    }
}
