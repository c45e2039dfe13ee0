//! Text-generation collaborator
//!
//! The engine talks to an external service that accepts a prompt and returns
//! free-form text. This module holds the client seam, the HTTP providers, the
//! retry/backoff policy and extraction of structured blocks from prose.

pub mod client;
pub mod extract;
pub mod mock;
pub mod retry;

pub use client::{
    GenerationClient, GenerationSettings, HttpGenerator, OfflineGenerator, Provider,
};
pub use extract::extract_json_block;
pub use mock::{FailingGenerator, ScriptedGenerator};
pub use retry::{AttemptFailure, RetryPolicy};
