//! State observer
//!
//! Turns a learner's most recent interaction records into one immutable
//! [`UserState`] snapshot. The observer is read-only and never fails: a store
//! error yields the same zeroed state a brand-new learner gets.

pub mod mastery;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::InteractionStore;
use crate::topics::TopicRegistry;
use crate::types::{InteractionRecord, UserState, STRENGTH_THRESHOLD, WEAK_THRESHOLD};
use crate::types::state::DEFAULT_GOAL;

pub use mastery::{classify_level, compute_mastery, registry_mean, select_topics};

/// Records read per observation
pub const DEFAULT_HISTORY_WINDOW: usize = 100;

/// Records kept as recent activity
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// Observation window sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Most recent records considered for mastery
    pub history_window: usize,

    /// Most recent records exposed as `recent_activity`
    pub recent_window: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

/// Builds `UserState` snapshots from an interaction store
#[derive(Clone)]
pub struct StateObserver {
    store: Arc<dyn InteractionStore>,
    registry: TopicRegistry,
    config: ObserverConfig,
}

impl StateObserver {
    pub fn new(store: Arc<dyn InteractionStore>, config: ObserverConfig) -> Self {
        Self {
            store,
            registry: TopicRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> ObserverConfig {
        self.config
    }

    /// Snapshot the learner's state
    pub async fn observe(&self, user_id: &str) -> UserState {
        match self.store.fetch_recent(user_id, self.config.history_window).await {
            Ok(records) => {
                let state = self.build_state(user_id, &records);
                debug!(
                    user_id,
                    total = state.total_interactions,
                    level = %state.level,
                    "Observed learner state"
                );
                state
            }
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read interaction history, using empty state");
                UserState::empty(user_id)
            }
        }
    }

    /// Pure state construction over records ordered most-recent-first
    pub fn build_state(&self, user_id: &str, records: &[InteractionRecord]) -> UserState {
        let window = &records[..records.len().min(self.config.history_window)];

        let mastery = compute_mastery(window, &self.registry);
        let level = classify_level(&mastery, &self.registry);
        let weak_topics = select_topics(&mastery, &self.registry, |score| score < WEAK_THRESHOLD);
        let strengths = select_topics(&mastery, &self.registry, |score| score >= STRENGTH_THRESHOLD);
        let recent_activity = window.iter().take(self.config.recent_window).cloned().collect();

        UserState {
            user_id: user_id.to_string(),
            mastery,
            total_interactions: window.len(),
            recent_activity,
            level,
            weak_topics,
            strengths,
            goal: DEFAULT_GOAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, TutorError};
    use crate::store::InMemoryInteractionStore;
    use crate::types::Level;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    struct BrokenStore;

    #[async_trait]
    impl InteractionStore for BrokenStore {
        async fn fetch_recent(&self, _: &str, _: usize) -> Result<Vec<InteractionRecord>> {
            Err(TutorError::Store("connection refused".to_string()))
        }

        async fn append(&self, _: &str, _: InteractionRecord) -> Result<usize> {
            Err(TutorError::Store("connection refused".to_string()))
        }

        async fn count(&self, _: &str) -> Result<usize> {
            Err(TutorError::Store("connection refused".to_string()))
        }
    }

    fn history(n: usize, correct: impl Fn(usize) -> bool) -> Vec<InteractionRecord> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        (0..n)
            .map(|i| InteractionRecord::new(i % 10, correct(i), 45.0, 5).at(base + Duration::minutes(i as i64)))
            .collect()
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty_state() {
        let observer = StateObserver::new(Arc::new(BrokenStore), ObserverConfig::default());
        let state = observer.observe("u1").await;

        assert_eq!(state.total_interactions, 0);
        assert_eq!(state.level, Level::Beginner);
        assert!(state.mastery.is_empty());
        assert!(state.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn test_window_bounds_mastery() {
        let store = InMemoryInteractionStore::new();
        // 50 old correct answers on topic 0, then 100 newer incorrect answers on topic 0
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let old: Vec<_> = (0..50)
            .map(|i| InteractionRecord::new(0, true, 30.0, 5).at(base + Duration::minutes(i)))
            .collect();
        let new: Vec<_> = (50..150)
            .map(|i| InteractionRecord::new(0, false, 30.0, 5).at(base + Duration::minutes(i)))
            .collect();
        store.seed("u1", old).await;
        store.seed("u1", new).await;

        let observer = StateObserver::new(Arc::new(store), ObserverConfig::default());
        let state = observer.observe("u1").await;

        assert_eq!(state.total_interactions, 100);
        assert_eq!(state.mastery_of(0), 0.0);
    }

    #[tokio::test]
    async fn test_recent_activity_most_recent_first() {
        let store = InMemoryInteractionStore::new();
        store.seed("u1", history(25, |i| i % 2 == 0)).await;

        let observer = StateObserver::new(Arc::new(store), ObserverConfig::default());
        let state = observer.observe("u1").await;

        assert_eq!(state.recent_activity.len(), 10);
        assert!(state.recent_activity[0].timestamp > state.recent_activity[1].timestamp);
        assert_eq!(state.recent_activity[0].topic_id, 24 % 10);
    }

    #[tokio::test]
    async fn test_weak_and_strong_topics() {
        let store = InMemoryInteractionStore::new();
        store.seed("u1", history(40, |i| i % 10 < 5)).await;

        let observer = StateObserver::new(Arc::new(store), ObserverConfig::default());
        let state = observer.observe("u1").await;

        let strong: Vec<_> = state.strengths.iter().map(|t| t.id).collect();
        let weak: Vec<_> = state.weak_topics.iter().map(|t| t.id).collect();
        assert_eq!(strong, vec![0, 1, 2, 3, 4]);
        assert_eq!(weak, vec![5, 6, 7, 8, 9]);
        assert_eq!(state.level, Level::Intermediate);
    }

    #[tokio::test]
    async fn test_observation_is_idempotent() {
        let store = InMemoryInteractionStore::new();
        store.seed("u1", history(60, |i| i % 3 != 0)).await;

        let observer = StateObserver::new(Arc::new(store), ObserverConfig::default());
        let first = observer.observe("u1").await;
        let second = observer.observe("u1").await;

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
