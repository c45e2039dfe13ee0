//! Action dispatcher
//!
//! Closed set of learner-facing actions, their handlers and chat intent
//! detection.

pub mod canned;
pub mod dispatcher;
pub mod intent;
pub mod kinds;
pub mod prompts;
pub mod types;

pub use dispatcher::{ActionDispatcher, UNKNOWN_ACTION_MESSAGE};
pub use intent::{detect_intent, ChatIntent};
pub use kinds::{ActionKind, UnknownAction};
pub use types::{ActionContent, ActionContext, ActionFailure, ActionResult, ContentKind};
