//! Type definitions module
//!
//! Core data model shared by every stage of the tutoring pipeline.

pub mod context;
pub mod interaction;
pub mod state;

// Re-export commonly used types
pub use context::{ChatMessage, ChatRole, ContextPatch, ConversationContext};
pub use interaction::{InteractionRecord, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use state::{Level, MasteryMap, TopicScore, UserState, STRENGTH_THRESHOLD, WEAK_THRESHOLD};
