//! Plan and decision types
//!
//! Both trees are deterministic; only the plan's prose may be replaced by
//! enrichment afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of plan chosen by the planning tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// No history yet
    Onboard,
    /// Every topic at 70 or above
    Advance,
    /// At least one weak topic
    Strengthen,
    /// Next topic below 70 in the learning path
    Progress,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::Onboard => "onboard",
            PlanAction::Advance => "advance",
            PlanAction::Strengthen => "strengthen",
            PlanAction::Progress => "progress",
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A learning plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Topic name, or "Advanced Projects"
    pub current_focus: String,

    pub action_type: PlanAction,

    pub reasoning: String,

    pub next_steps: Vec<String>,

    pub time_estimate: String,

    /// Only set by a successful enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_criteria: Option<String>,

    /// Only set by a successful enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
}

/// Immediate action category chosen by the decision tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextAction {
    Explain,
    Practice,
    Assess,
    Review,
    Celebrate,
    Motivate,
    Project,
}

impl NextAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NextAction::Explain => "EXPLAIN",
            NextAction::Practice => "PRACTICE",
            NextAction::Assess => "ASSESS",
            NextAction::Review => "REVIEW",
            NextAction::Celebrate => "CELEBRATE",
            NextAction::Motivate => "MOTIVATE",
            NextAction::Project => "PROJECT",
        }
    }
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the action decision tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDecision {
    pub action: NextAction,
    pub reason: String,
}

impl ActionDecision {
    pub fn new(action: NextAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}
