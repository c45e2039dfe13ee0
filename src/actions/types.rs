//! Action inputs and results

use serde::{Deserialize, Serialize};

use crate::planning::Milestone;
use crate::types::Level;

/// Everything a handler may need, assembled once per cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    /// Plan focus
    pub topic: String,

    pub user_level: Level,

    /// Topic names of recent incorrect answers
    pub recent_errors: Vec<String>,

    /// Milestone reached at the current interaction count
    pub milestone: Option<Milestone>,

    pub total_interactions: usize,

    /// Current correct-answer streak
    pub streak: usize,

    /// Topics at 85 or above
    pub mastered_topics: Vec<String>,

    /// Rounded mastery of the focus topic, 0 when it is not a registry topic
    pub current_mastery: u32,

    /// "easy" for beginners, "medium" otherwise
    pub difficulty: String,

    /// Number of practice problems requested
    pub practice_count: usize,
}

impl ActionContext {
    /// Minimal context around a focus topic
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            user_level: Level::Beginner,
            recent_errors: Vec::new(),
            milestone: None,
            total_interactions: 0,
            streak: 0,
            mastered_topics: Vec::new(),
            current_mastery: 0,
            difficulty: "easy".to_string(),
            practice_count: 3,
        }
    }
}

/// What a delivered action contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Explanation,
    Practice,
    Assessment,
    Review,
    Celebration,
    Motivation,
    ProjectSuggestion,
    Onboarding,
    Advancement,
    ImprovementPlan,
}

/// Delivered action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContent {
    #[serde(rename = "type")]
    pub kind: ContentKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    pub content: String,

    /// Fixed "what's next" line
    pub next_action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureTag {
    Error,
}

/// Typed failure, serialized as `{"type": "error", "message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    #[serde(rename = "type")]
    pub tag: FailureTag,
    pub message: String,
}

/// Outcome of executing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResult {
    Delivered(ActionContent),
    Failed(ActionFailure),
}

impl ActionResult {
    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Failed(ActionFailure {
            tag: FailureTag::Error,
            message: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionResult::Failed(_))
    }

    /// Delivered content, if any
    pub fn content(&self) -> Option<&ActionContent> {
        match self {
            ActionResult::Delivered(content) => Some(content),
            ActionResult::Failed(_) => None,
        }
    }

    /// Chat rendering: content followed by the bolded next step
    pub fn to_chat_text(&self) -> String {
        match self {
            ActionResult::Delivered(content) => {
                format!("{}\n\n**{}**", content.content, content.next_action)
            }
            ActionResult::Failed(failure) => {
                format!("{}\n\n**What would you like to do next?**", failure.message)
            }
        }
    }
}
