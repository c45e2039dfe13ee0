//! Scripted generation clients for tests and offline runs

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::GenerationError;
use crate::llm::client::GenerationClient;

/// Replays queued replies in order and records every prompt it receives.
///
/// Once the queue is drained, calls fail with [`GenerationError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator answering every call with the given replies, in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new();
        for reply in replies {
            generator.push_reply(reply);
        }
        generator
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: GenerationError) {
        self.lock_replies().push_back(Err(error));
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, GenerationError>>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        self.lock_replies()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

/// Fails every call with the same error
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    error: GenerationError,
}

impl FailingGenerator {
    pub fn new(error: GenerationError) -> Self {
        Self { error }
    }

    /// Upstream timing out on every call
    pub fn timeout() -> Self {
        Self::new(GenerationError::Timeout { duration_ms: 30_000 })
    }
}

#[async_trait]
impl GenerationClient for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_empty() {
        let generator = ScriptedGenerator::with_replies(["one", "two"]);

        assert_eq!(generator.generate("a").await.unwrap(), "one");
        assert_eq!(generator.generate("b").await.unwrap(), "two");
        assert_eq!(
            generator.generate("c").await.unwrap_err(),
            GenerationError::EmptyResponse
        );
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_generator() {
        let generator = FailingGenerator::timeout();
        assert!(matches!(
            generator.generate("x").await,
            Err(GenerationError::Timeout { .. })
        ));
    }
}
