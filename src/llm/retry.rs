//! Retry policy for generation requests
//!
//! Bounded retry with exponential backoff and jitter:
//! - Attempt cap: 3 by default
//! - HTTP 429: wait `Retry-After` seconds when present, else `base × 2^attempt`
//! - 5xx, network failures and timeouts: `base × 2^attempt`
//! - Every wait gets 0-300ms of random jitter
//! - Other statuses are returned immediately
//!
//! Waits use `tokio::time::sleep`, so only the calling task is suspended.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

use crate::errors::GenerationError;

/// Default number of attempts, including the first one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (1 second)
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Upper bound of the random jitter added to every wait
pub const DEFAULT_MAX_JITTER_MS: u64 = 300;

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    /// HTTP status, `None` for transport failures
    pub status: Option<u16>,

    /// Parsed `Retry-After` header, in seconds
    pub retry_after: Option<u64>,

    /// Upstream diagnostic body
    pub body: Option<String>,

    pub message: String,

    /// Set when the attempt hit the request timeout
    pub timeout_ms: Option<u64>,
}

impl AttemptFailure {
    /// Non-success HTTP response
    pub fn status(status: u16, retry_after: Option<u64>, body: Option<String>) -> Self {
        Self {
            status: Some(status),
            retry_after,
            body,
            message: format!("HTTP {}", status),
            timeout_ms: None,
        }
    }

    /// Connection or protocol failure without a status
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            retry_after: None,
            body: None,
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Request exceeded its timeout
    pub fn timeout(duration_ms: u64) -> Self {
        Self {
            status: None,
            retry_after: None,
            body: None,
            message: format!("timed out after {}ms", duration_ms),
            timeout_ms: Some(duration_ms),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(HTTP_TOO_MANY_REQUESTS)
    }

    /// 429, 5xx and status-less failures are transient
    pub fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(HTTP_TOO_MANY_REQUESTS) => true,
            Some(status) => status >= 500,
        }
    }
}

/// Parse a `Retry-After` header given in seconds. HTTP-date values are ignored.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Retry policy with exponential backoff and jitter
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    /// Policy with default settings
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_jitter_ms: DEFAULT_MAX_JITTER_MS,
        }
    }

    /// Policy with custom settings; `max_attempts` is clamped to at least 1
    pub fn with_config(max_attempts: u32, base_delay_ms: u64, max_jitter_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
            max_jitter_ms,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based), without jitter
    pub fn base_delay(&self, attempt: u32, failure: &AttemptFailure) -> Duration {
        let hinted = if failure.is_rate_limited() {
            failure.retry_after.map(|secs| secs.saturating_mul(1000))
        } else {
            None
        };

        let delay_ms = hinted.unwrap_or_else(|| {
            self.base_delay_ms
                .saturating_mul(2u64.saturating_pow(attempt))
        });

        Duration::from_millis(delay_ms)
    }

    /// Wait before the attempt following `attempt`, jitter included
    pub fn delay_for(&self, attempt: u32, failure: &AttemptFailure) -> Duration {
        let jitter = if self.max_jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        } else {
            0
        };
        self.base_delay(attempt, failure) + Duration::from_millis(jitter)
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// cap is reached
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptFailure>>,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if !failure.is_retryable() || attempt >= self.max_attempts {
                        return Err(Self::exhausted(failure, attempt));
                    }

                    let delay = self.delay_for(attempt, &failure);
                    warn!(
                        attempt,
                        status = ?failure.status,
                        delay_ms = delay.as_millis() as u64,
                        "Generation request failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn exhausted(failure: AttemptFailure, attempts: u32) -> GenerationError {
        if failure.is_rate_limited() {
            return GenerationError::RateLimited {
                retry_after: failure.retry_after,
                body: failure.body,
                attempts,
            };
        }

        if let Some(duration_ms) = failure.timeout_ms {
            return GenerationError::Timeout { duration_ms };
        }

        GenerationError::Upstream {
            status: failure.status,
            message: failure.message,
            body: failure.body,
        }
    }
}
