//! Transcript Store port (C4, `spec.md` §4.4).

use async_trait::async_trait;

use crate::domain::{CallId, TranscriptTurn};

/// Concurrency-safe, append-only `callId → [turn]` mapping.
///
/// `read` returns a snapshot so a concurrent `append` can never be observed
/// half-written (`spec.md` §4.4, §5).
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn append(&self, call_id: &CallId, turn: TranscriptTurn);
    async fn read(&self, call_id: &CallId) -> Vec<TranscriptTurn>;
}
