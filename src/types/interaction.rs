//! Interaction records
//!
//! One record per logged attempt at a question. Records are immutable once
//! written and the per-user history is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TutorError};
use crate::topics::{TopicId, TopicRegistry};

/// Lowest declared difficulty
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest declared difficulty
pub const MAX_DIFFICULTY: u8 = 10;

/// A single logged attempt at a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Registry topic the question belongs to
    pub topic_id: TopicId,

    /// Whether the learner answered correctly
    pub correct: bool,

    /// Time spent on the attempt, in seconds
    #[serde(default)]
    pub time_spent_seconds: f64,

    /// Declared difficulty, 1..=10
    pub difficulty: u8,

    /// When the attempt was logged
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Create a record stamped with the current time
    pub fn new(topic_id: TopicId, correct: bool, time_spent_seconds: f64, difficulty: u8) -> Self {
        Self {
            topic_id,
            correct,
            time_spent_seconds,
            difficulty,
            timestamp: Utc::now(),
        }
    }

    /// Same record with an explicit timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check the record against the data model before it is appended
    pub fn validate(&self, registry: &TopicRegistry) -> Result<()> {
        if !registry.contains(self.topic_id) {
            return Err(TutorError::UnknownTopic(format!("topic id {}", self.topic_id)));
        }

        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(TutorError::InvalidRecord(format!(
                "difficulty {} outside {}..={}",
                self.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
            )));
        }

        if !self.time_spent_seconds.is_finite() || self.time_spent_seconds < 0.0 {
            return Err(TutorError::InvalidRecord(format!(
                "time spent {} is not a non-negative number",
                self.time_spent_seconds
            )));
        }

        Ok(())
    }
}
