//! Generation collaborator client
//!
//! `generate(prompt) → text` over HTTP, with the retry policy from
//! [`crate::llm::retry`]. Two providers are supported:
//! - Gemini `generateContent` (API key passed as a query parameter)
//! - Ollama `/api/generate`, non-streaming

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::errors::GenerationError;
use crate::llm::retry::{parse_retry_after, AttemptFailure, RetryPolicy};

/// Default Gemini endpoint
pub const DEFAULT_GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default Ollama model
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:7b-instruct";

/// Request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Anything that turns a prompt into free-form text
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Backend flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Gemini,
    Ollama,
    /// No collaborator; every call fails and callers fall back
    Offline,
}

/// Resolved settings for an HTTP generator
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub retry: RetryPolicy,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            endpoint: DEFAULT_GEMINI_URL.to_string(),
            model: "gemini-pro".to_string(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            temperature: 0.7,
            max_output_tokens: 1000,
            retry: RetryPolicy::new(),
        }
    }
}

/// HTTP-backed generation client
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    settings: GenerationSettings,
}

impl HttpGenerator {
    pub fn new(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Backend a request would go to, or why none is available
    fn backend(&self) -> Result<Backend<'_>, GenerationError> {
        match self.settings.provider {
            Provider::Gemini => match self.settings.api_key.as_deref() {
                Some(key) if !key.is_empty() => Ok(Backend::Gemini { key }),
                _ => Err(GenerationError::NotConfigured("missing Gemini API key".to_string())),
            },
            Provider::Ollama => Ok(Backend::Ollama),
            Provider::Offline => Err(GenerationError::NotConfigured("offline provider".to_string())),
        }
    }

    async fn send_once(&self, backend: Backend<'_>, prompt: &str) -> Result<String, AttemptFailure> {
        match backend {
            Backend::Gemini { key } => self.send_gemini(key, prompt).await,
            Backend::Ollama => self.send_ollama(prompt).await,
        }
    }

    async fn send_gemini(&self, key: &str, prompt: &str) -> Result<String, AttemptFailure> {
        let request = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_output_tokens,
            }
        });

        let response = self
            .client
            .post(&self.settings.endpoint)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let response = Self::check_status(response).await?;
        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AttemptFailure::transport(format!("Failed to decode response: {}", e)))?;

        Ok(body.first_text().unwrap_or_default())
    }

    async fn send_ollama(&self, prompt: &str) -> Result<String, AttemptFailure> {
        let url = format!("{}/api/generate", self.settings.endpoint.trim_end_matches('/'));
        let request = OllamaGenerateRequest {
            model: self.settings.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: json!({
                "temperature": self.settings.temperature,
                "num_predict": self.settings.max_output_tokens,
            }),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let response = Self::check_status(response).await?;
        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| AttemptFailure::transport(format!("Failed to decode response: {}", e)))?;

        Ok(body.response)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AttemptFailure> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.ok().filter(|text| !text.is_empty());

        Err(AttemptFailure::status(status.as_u16(), retry_after, body))
    }

    fn transport_failure(&self, error: reqwest::Error) -> AttemptFailure {
        if error.is_timeout() {
            AttemptFailure::timeout(self.settings.timeout_ms)
        } else {
            AttemptFailure::transport(error.to_string())
        }
    }
}

#[async_trait]
impl GenerationClient for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let backend = self.backend()?;

        debug!(provider = ?self.settings.provider, prompt_len = prompt.len(), "Sending generation request");
        let text = self.settings.retry.execute(|| self.send_once(backend, prompt)).await?;

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Resolved request target; only providers that can actually be called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend<'a> {
    Gemini { key: &'a str },
    Ollama,
}

/// Collaborator stand-in that always reports itself unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl GenerationClient for OfflineGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured("offline provider".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}
