//! Agent orchestration module
//!
//! The guidance cycle and the operations built on the same collaborators.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{ChatReply, Guidance, RecordOutcome, TutorOrchestrator, CHAT_FALLBACK};
pub use state::CycleStage;
