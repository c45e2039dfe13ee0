//! Action kinds
//!
//! The closed set of actions the dispatcher can execute:
//! - explain_topic, give_practice, run_assessment, review_mistakes
//! - celebrate_progress, motivate_user, suggest_project
//! - onboard, advance, strengthen

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::planning::NextAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ExplainTopic,
    GivePractice,
    RunAssessment,
    ReviewMistakes,
    CelebrateProgress,
    MotivateUser,
    SuggestProject,
    Onboard,
    Advance,
    Strengthen,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::ExplainTopic,
        ActionKind::GivePractice,
        ActionKind::RunAssessment,
        ActionKind::ReviewMistakes,
        ActionKind::CelebrateProgress,
        ActionKind::MotivateUser,
        ActionKind::SuggestProject,
        ActionKind::Onboard,
        ActionKind::Advance,
        ActionKind::Strengthen,
    ];

    /// Wire name
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ExplainTopic => "explain_topic",
            ActionKind::GivePractice => "give_practice",
            ActionKind::RunAssessment => "run_assessment",
            ActionKind::ReviewMistakes => "review_mistakes",
            ActionKind::CelebrateProgress => "celebrate_progress",
            ActionKind::MotivateUser => "motivate_user",
            ActionKind::SuggestProject => "suggest_project",
            ActionKind::Onboard => "onboard",
            ActionKind::Advance => "advance",
            ActionKind::Strengthen => "strengthen",
        }
    }

    /// Handled from literal text without a collaborator call
    pub fn is_canned(&self) -> bool {
        matches!(
            self,
            ActionKind::CelebrateProgress
                | ActionKind::MotivateUser
                | ActionKind::Onboard
                | ActionKind::Advance
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matches no [`ActionKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action type: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl From<NextAction> for ActionKind {
    fn from(action: NextAction) -> Self {
        match action {
            NextAction::Explain => ActionKind::ExplainTopic,
            NextAction::Practice => ActionKind::GivePractice,
            NextAction::Assess => ActionKind::RunAssessment,
            NextAction::Review => ActionKind::ReviewMistakes,
            NextAction::Celebrate => ActionKind::CelebrateProgress,
            NextAction::Motivate => ActionKind::MotivateUser,
            NextAction::Project => ActionKind::SuggestProject,
        }
    }
}
