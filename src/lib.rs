//! StudyBuddy v0.5.0 - Adaptive Tutoring Decision Engine
//!
//! Decides what a learner should do next from their interaction history.
//!
//! # Architecture
//!
//! - **Observer**: interaction history → mastery snapshot ([`types::UserState`])
//! - **Planner**: learning plan, milestones and the next-action decision
//! - **Evaluator**: performance analysis, readiness, patterns and reports
//! - **Actions**: canned and generated learning content per action kind
//! - **Agent**: the Observe → Plan → Decide → Act → Evaluate → Persist cycle
//!
//! Free-form text comes from an external generation collaborator
//! ([`llm::GenerationClient`]). Every collaborator failure degrades to a
//! deterministic fallback; the engine never depends on it for correctness.

pub mod actions;
pub mod agent;
pub mod cli;
pub mod errors;
pub mod evaluation;
pub mod llm;
pub mod logging;
pub mod observer;
pub mod planning;
pub mod store;
pub mod topics;
pub mod types;

// Re-export commonly used types
pub use agent::{Guidance, TutorOrchestrator};
pub use errors::{GenerationError, Result, TutorError};
pub use topics::TopicRegistry;
pub use types::{InteractionRecord, UserState};
