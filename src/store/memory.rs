//! In-memory stores
//!
//! Process-local implementations backed by `tokio::sync::RwLock`, used by
//! tests and by embedders that keep history elsewhere.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::Result;
use crate::store::{most_recent_first, ContextStore, InteractionStore};
use crate::types::{ContextPatch, ConversationContext, InteractionRecord};

/// Interaction history held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryInteractionStore {
    records: Arc<RwLock<HashMap<String, Vec<InteractionRecord>>>>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's history in append order (oldest first)
    pub async fn seed(&self, user_id: &str, records: Vec<InteractionRecord>) {
        let mut guard = self.records.write().await;
        guard.entry(user_id.to_string()).or_default().extend(records);
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn fetch_recent(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionRecord>> {
        let guard = self.records.read().await;
        Ok(guard
            .get(user_id)
            .map(|records| most_recent_first(records, limit))
            .unwrap_or_default())
    }

    async fn append(&self, user_id: &str, record: InteractionRecord) -> Result<usize> {
        let mut guard = self.records.write().await;
        let records = guard.entry(user_id.to_string()).or_default();
        records.push(record);
        Ok(records.len())
    }

    async fn count(&self, user_id: &str) -> Result<usize> {
        let guard = self.records.read().await;
        Ok(guard.get(user_id).map(Vec::len).unwrap_or(0))
    }
}

/// Session contexts held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryContextStore {
    contexts: Arc<RwLock<HashMap<String, ConversationContext>>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get(&self, session_key: &str) -> Result<Option<ConversationContext>> {
        Ok(self.contexts.read().await.get(session_key).cloned())
    }

    async fn upsert(&self, session_key: &str, patch: ContextPatch) -> Result<ConversationContext> {
        let mut guard = self.contexts.write().await;
        let context = guard.entry(session_key.to_string()).or_default();
        context.apply(patch);
        Ok(context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_fetch() {
        let store = InMemoryInteractionStore::new();
        assert_eq!(store.append("u1", InteractionRecord::new(0, true, 10.0, 3)).await.unwrap(), 1);
        assert_eq!(store.append("u1", InteractionRecord::new(1, false, 20.0, 4)).await.unwrap(), 2);

        let recent = store.fetch_recent("u1", 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(store.count("u1").await.unwrap(), 2);
        assert!(store.fetch_recent("nobody", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_context_upsert_creates_once() {
        let store = InMemoryContextStore::new();
        assert!(store.get("s1").await.unwrap().is_none());

        let first = store
            .upsert("s1", ContextPatch {
                last_recommendation: Some("Review".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let second = store.upsert("s1", ContextPatch::default()).await.unwrap();

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(second.last_recommendation.as_deref(), Some("Review"));
    }
}
