//! Guidance cycle stages
//!
//! A cycle is a straight line with no branches or loops:
//! Observe → Plan → Decide → Act → Evaluate → Persist → Done

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    /// Snapshot the learner state
    Observe,

    /// Build and enrich the learning plan
    Plan,

    /// Pick the immediate action from the snapshot
    Decide,

    /// Execute the decided action around the plan focus
    Act,

    /// Analyze performance
    Evaluate,

    /// Write the session context
    Persist,

    /// Terminal
    Done,
}

impl CycleStage {
    /// Stage that follows this one; `Done` stays `Done`
    pub fn next(self) -> Self {
        match self {
            CycleStage::Observe => CycleStage::Plan,
            CycleStage::Plan => CycleStage::Decide,
            CycleStage::Decide => CycleStage::Act,
            CycleStage::Act => CycleStage::Evaluate,
            CycleStage::Evaluate => CycleStage::Persist,
            CycleStage::Persist | CycleStage::Done => CycleStage::Done,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleStage::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStage::Observe => "observe",
            CycleStage::Plan => "plan",
            CycleStage::Decide => "decide",
            CycleStage::Act => "act",
            CycleStage::Evaluate => "evaluate",
            CycleStage::Persist => "persist",
            CycleStage::Done => "done",
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = CycleStage::Observe;
        let mut seen = vec![stage];
        while !stage.is_terminal() {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                CycleStage::Observe,
                CycleStage::Plan,
                CycleStage::Decide,
                CycleStage::Act,
                CycleStage::Evaluate,
                CycleStage::Persist,
                CycleStage::Done,
            ]
        );
    }

    #[test]
    fn test_done_is_absorbing() {
        assert_eq!(CycleStage::Done.next(), CycleStage::Done);
    }
}
