//! Conversation context
//!
//! Small per-session record of the current focus and the last
//! recommendation. It is advisory display state: writes are last-write-wins
//! and nothing in the engine depends on reading its own writes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topics::TopicId;
use crate::types::MasteryMap;

/// Messages kept per session for conversational continuity
pub const MAX_SESSION_MESSAGES: usize = 50;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Tutor,
}

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tutor,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Mutable per-session context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Session identifier, assigned on first write
    pub session_id: String,

    /// Focus of the latest plan
    pub current_topic: Option<String>,

    /// Registry id of the focus, `None` when the focus is not a registry topic
    pub current_topic_id: Option<TopicId>,

    /// Mastery snapshot from the latest cycle
    #[serde(default)]
    pub user_mastery: MasteryMap,

    /// Overall score from the latest performance analysis
    pub overall_score: Option<u32>,

    /// Reason attached to the latest action decision
    pub last_recommendation: Option<String>,

    #[serde(default)]
    pub learning_goals: Vec<String>,

    /// Recent chat turns, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            session_id: format!("session_{}", uuid::Uuid::new_v4()),
            current_topic: None,
            current_topic_id: None,
            user_mastery: MasteryMap::new(),
            overall_score: None,
            last_recommendation: None,
            learning_goals: Vec::new(),
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Apply a partial update; `None` fields are left untouched
    pub fn apply(&mut self, patch: ContextPatch) {
        if let Some(topic) = patch.current_topic {
            self.current_topic = Some(topic);
            self.current_topic_id = patch.current_topic_id;
        }
        if let Some(mastery) = patch.user_mastery {
            self.user_mastery = mastery;
        }
        if let Some(score) = patch.overall_score {
            self.overall_score = Some(score);
        }
        if let Some(recommendation) = patch.last_recommendation {
            self.last_recommendation = Some(recommendation);
        }
        if let Some(goals) = patch.learning_goals {
            self.learning_goals = goals;
        }
        if !patch.append_messages.is_empty() {
            self.messages.extend(patch.append_messages);
            let excess = self.messages.len().saturating_sub(MAX_SESSION_MESSAGES);
            self.messages.drain(..excess);
        }
        self.updated_at = Utc::now();
    }

    /// The last `n` messages, oldest first
    pub fn recent_messages(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for [`ConversationContext`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextPatch {
    /// New focus; `current_topic_id` is written together with it
    pub current_topic: Option<String>,
    pub current_topic_id: Option<TopicId>,
    pub user_mastery: Option<MasteryMap>,
    pub overall_score: Option<u32>,
    pub last_recommendation: Option<String>,
    pub learning_goals: Option<Vec<String>>,
    pub append_messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_keeps_untouched_fields() {
        let mut context = ConversationContext::new();
        context.apply(ContextPatch {
            last_recommendation: Some("Continue targeted practice".to_string()),
            ..Default::default()
        });
        context.apply(ContextPatch {
            current_topic: Some("Algorithms".to_string()),
            current_topic_id: Some(1),
            ..Default::default()
        });

        assert_eq!(context.current_topic.as_deref(), Some("Algorithms"));
        assert_eq!(context.current_topic_id, Some(1));
        assert_eq!(
            context.last_recommendation.as_deref(),
            Some("Continue targeted practice")
        );
    }

    #[test]
    fn test_non_registry_focus_clears_id() {
        let mut context = ConversationContext::new();
        context.apply(ContextPatch {
            current_topic: Some("Algorithms".to_string()),
            current_topic_id: Some(1),
            ..Default::default()
        });
        context.apply(ContextPatch {
            current_topic: Some("Advanced Projects".to_string()),
            current_topic_id: None,
            ..Default::default()
        });
        assert_eq!(context.current_topic_id, None);
    }

    #[test]
    fn test_messages_are_bounded() {
        let mut context = ConversationContext::new();
        for i in 0..(MAX_SESSION_MESSAGES + 5) {
            context.apply(ContextPatch {
                append_messages: vec![ChatMessage::user(format!("m{}", i))],
                ..Default::default()
            });
        }
        assert_eq!(context.messages.len(), MAX_SESSION_MESSAGES);
        assert_eq!(context.messages[0].content, "m5");
        assert_eq!(context.recent_messages(2).len(), 2);
    }
}
