//! In-memory `TranscriptStore` (C4): `HashMap<CallId, Vec<TranscriptTurn>>`
//! behind a `tokio::sync::RwLock`. `read` clones the snapshot under the
//! lock so a concurrent `append` is never observed half-written.

use std::collections::HashMap;

use async_trait::async_trait;
use relay_core::domain::{CallId, TranscriptTurn};
use relay_core::ports::TranscriptStore;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTranscriptStore {
    turns: RwLock<HashMap<CallId, Vec<TranscriptTurn>>>,
}

impl InMemoryTranscriptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append(&self, call_id: &CallId, turn: TranscriptTurn) {
        let mut turns = self.turns.write().await;
        turns.entry(call_id.clone()).or_default().push(turn);
    }

    async fn read(&self, call_id: &CallId) -> Vec<TranscriptTurn> {
        let turns = self.turns.read().await;
        turns.get(call_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relay_core::domain::Role;

    fn turn(role: Role, text: &str) -> TranscriptTurn {
        TranscriptTurn {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_then_read_preserves_order() {
        let store = InMemoryTranscriptStore::new();
        let call_id = CallId::new("CA1");

        store.append(&call_id, turn(Role::User, "hello")).await;
        store.append(&call_id, turn(Role::Agent, "hi there")).await;

        let turns = store.read(&call_id).await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, "hello");
        assert_eq!(turns[1].text, "hi there");
    }

    #[tokio::test]
    async fn read_on_unknown_call_is_empty_not_an_error() {
        let store = InMemoryTranscriptStore::new();
        let turns = store.read(&CallId::new("unknown")).await;
        assert!(turns.is_empty());
    }
}
