//! Learner state snapshot
//!
//! `UserState` is rebuilt from the interaction history on every cycle and is
//! never mutated afterwards; every stage of a cycle reads the same snapshot.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::topics::TopicId;
use crate::types::InteractionRecord;

/// Per-topic mastery, 0..=100, ordered by topic id
pub type MasteryMap = BTreeMap<TopicId, f64>;

/// Mastery below this marks a weak topic
pub const WEAK_THRESHOLD: f64 = 60.0;

/// Mastery at or above this marks a strength
pub const STRENGTH_THRESHOLD: f64 = 75.0;

/// Goal reported for learners with readable history
pub const DEFAULT_GOAL: &str = "Master all topics for technical interviews";

/// Goal reported when the history could not be read
pub const FALLBACK_GOAL: &str = "Master all topics";

/// Learner level derived from mean mastery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// Classify a mean mastery: `<40` beginner, `<70` intermediate, else advanced
    pub fn classify(mean_mastery: f64) -> Self {
        if mean_mastery < 40.0 {
            Level::Beginner
        } else if mean_mastery < 70.0 {
            Level::Intermediate
        } else {
            Level::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A topic paired with its mastery score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub id: TopicId,
    pub name: String,
    pub score: f64,
}

/// Immutable snapshot of a learner, built by the observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Learner identifier
    pub user_id: String,

    /// Mastery per topic over the observed window
    pub mastery: MasteryMap,

    /// Number of records in the observed window
    pub total_interactions: usize,

    /// Most recent records, most-recent-first
    pub recent_activity: Vec<InteractionRecord>,

    /// Level from the mean mastery over the whole registry
    pub level: Level,

    /// Topics with mastery below 60
    pub weak_topics: Vec<TopicScore>,

    /// Topics with mastery of 75 or more
    pub strengths: Vec<TopicScore>,

    /// Learning goal
    pub goal: String,
}

impl UserState {
    /// Zeroed state, indistinguishable from a brand-new learner
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            mastery: MasteryMap::new(),
            total_interactions: 0,
            recent_activity: Vec::new(),
            level: Level::Beginner,
            weak_topics: Vec::new(),
            strengths: Vec::new(),
            goal: FALLBACK_GOAL.to_string(),
        }
    }

    /// Mastery for a topic, 0 when absent
    pub fn mastery_of(&self, topic_id: TopicId) -> f64 {
        self.mastery.get(&topic_id).copied().unwrap_or(0.0)
    }

    /// Topics at or above `threshold`, in topic-id order
    pub fn topics_at_least(&self, threshold: f64) -> Vec<TopicId> {
        self.mastery
            .iter()
            .filter(|(_, score)| **score >= threshold)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(Level::classify(0.0), Level::Beginner);
        assert_eq!(Level::classify(39.99), Level::Beginner);
        assert_eq!(Level::classify(40.0), Level::Intermediate);
        assert_eq!(Level::classify(69.99), Level::Intermediate);
        assert_eq!(Level::classify(70.0), Level::Advanced);
        assert_eq!(Level::classify(100.0), Level::Advanced);
    }

    #[test]
    fn test_empty_state() {
        let state = UserState::empty("u1");
        assert_eq!(state.total_interactions, 0);
        assert_eq!(state.level, Level::Beginner);
        assert_eq!(state.mastery_of(3), 0.0);
    }

    #[test]
    fn test_level_serializes_snake_case() {
        let json = serde_json::to_string(&Level::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
    }
}
