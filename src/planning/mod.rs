//! Learning planner
//!
//! Deterministic plan and action trees, best-effort plan enrichment and the
//! milestone table.

pub mod enrichment;
pub mod milestones;
pub mod planner;
pub mod types;

pub use enrichment::{decode_enrichment, DecodeError, Enrichment};
pub use milestones::{check_milestones, Milestone, MILESTONES};
pub use planner::{correct_streak, decide_next_action, Planner, MASTERED_THRESHOLD, NEEDS_WORK_THRESHOLD};
pub use types::{ActionDecision, NextAction, Plan, PlanAction};
