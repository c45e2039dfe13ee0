//! Storage interfaces
//!
//! The engine consumes two stores:
//! - an append-only interaction store, read most-recent-first
//! - a session context store with partial upserts
//!
//! Neither is coordinated across requests. Concurrent upserts to the same
//! session resolve last-write-wins; callers that need read-your-writes must
//! serialize per session themselves.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{ContextPatch, ConversationContext, InteractionRecord};

pub use file::JsonFileStore;
pub use memory::{InMemoryContextStore, InMemoryInteractionStore};

/// Append-only interaction history
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Up to `limit` records for a user, most-recent-first
    async fn fetch_recent(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionRecord>>;

    /// Append one record and return the user's lifetime count including it.
    ///
    /// The count is taken under the same write as the append, so concurrent
    /// appends each observe a distinct total.
    async fn append(&self, user_id: &str, record: InteractionRecord) -> Result<usize>;

    /// Lifetime record count for a user
    async fn count(&self, user_id: &str) -> Result<usize>;
}

/// Per-session conversation context
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn get(&self, session_key: &str) -> Result<Option<ConversationContext>>;

    /// Create the context if absent, apply the patch, return the stored value
    async fn upsert(&self, session_key: &str, patch: ContextPatch) -> Result<ConversationContext>;
}

/// Order a user's history most-recent-first and keep at most `limit`.
///
/// Records with equal timestamps keep reverse insertion order, so the
/// result is deterministic for an unchanged history.
pub(crate) fn most_recent_first(records: &[InteractionRecord], limit: usize) -> Vec<InteractionRecord> {
    let mut ordered: Vec<InteractionRecord> = records.iter().rev().cloned().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    ordered.truncate(limit);
    ordered
}
