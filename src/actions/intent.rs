//! Chat intent detection
//!
//! Keyword matching over the lowercased message; the first matching group wins.

use crate::actions::kinds::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatIntent {
    /// Dispatch an action around the current plan focus
    Action(ActionKind),
    /// Summarise the current learning plan
    Plan,
    /// Free conversation with the mentor
    Conversation,
}

const EXPLAIN_WORDS: [&str; 3] = ["explain", "what is", "how does"];
const PRACTICE_WORDS: [&str; 3] = ["practice", "problem", "exercise"];
const ASSESS_WORDS: [&str; 3] = ["assess", "test me", "quiz"];
const PLAN_WORDS: [&str; 3] = ["plan", "roadmap", "what next"];
const PROJECT_WORDS: [&str; 2] = ["project", "build"];

pub fn detect_intent(message: &str) -> ChatIntent {
    let lower = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if mentions(&EXPLAIN_WORDS) {
        ChatIntent::Action(ActionKind::ExplainTopic)
    } else if mentions(&PRACTICE_WORDS) {
        ChatIntent::Action(ActionKind::GivePractice)
    } else if mentions(&ASSESS_WORDS) {
        ChatIntent::Action(ActionKind::RunAssessment)
    } else if mentions(&PLAN_WORDS) {
        ChatIntent::Plan
    } else if mentions(&PROJECT_WORDS) {
        ChatIntent::Action(ActionKind::SuggestProject)
    } else {
        ChatIntent::Conversation
    }
}
