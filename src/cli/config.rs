//! Configuration management for StudyBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.studybuddy/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TutorError};
use crate::llm::client::{
    DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT_MS,
};
use crate::llm::retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_JITTER_MS};
use crate::llm::{GenerationSettings, Provider, RetryPolicy};
use crate::logging::LOG_LEVELS;
use crate::observer::ObserverConfig;

const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Complete configuration for StudyBuddy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text-generation collaborator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: Provider,

    /// Provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_jitter_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// File system paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON document holding interaction history and session contexts
    pub state_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            endpoint: None,
            model: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_DELAY_MS,
            max_jitter_ms: DEFAULT_MAX_JITTER_MS,
            temperature: 0.7,
            max_output_tokens: 1000,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: "~/.studybuddy/state.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            match self.provider {
                Provider::Ollama => DEFAULT_OLLAMA_URL,
                Provider::Gemini | Provider::Offline => DEFAULT_GEMINI_URL,
            }
            .to_string()
        })
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            match self.provider {
                Provider::Ollama => DEFAULT_OLLAMA_MODEL,
                Provider::Gemini | Provider::Offline => DEFAULT_GEMINI_MODEL,
            }
            .to_string()
        })
    }

    /// Resolve into client settings, reading the API key from the environment
    pub fn to_settings(&self) -> GenerationSettings {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        GenerationSettings {
            provider: self.provider,
            endpoint: self.endpoint(),
            model: self.model(),
            api_key,
            timeout_ms: self.timeout_ms,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            retry: RetryPolicy::with_config(self.max_attempts, self.base_backoff_ms, self.max_jitter_ms),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TutorError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.studybuddy/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".studybuddy").join("config.toml"))
    }

    /// Where `config --write` saves: the explicit path, else the default location
    pub fn write_target(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.observer.history_window == 0 || self.observer.recent_window == 0 {
            return Err(TutorError::ConfigError(
                "observer windows must be greater than 0".to_string(),
            ));
        }

        if self.observer.recent_window > self.observer.history_window {
            return Err(TutorError::ConfigError(
                "recent_window must not exceed history_window".to_string(),
            ));
        }

        if self.generation.max_attempts == 0 {
            return Err(TutorError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.generation.timeout_ms == 0 {
            return Err(TutorError::ConfigError(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(TutorError::ConfigError(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(TutorError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TutorError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TutorError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TutorError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Resolved state file path
    pub fn state_file(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.provider, Provider::Gemini);
        assert_eq!(config.generation.timeout_ms, 30_000);
        assert_eq!(config.generation.max_attempts, 3);
        assert_eq!(config.observer.history_window, 100);
        assert_eq!(config.observer.recent_window, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_windows() {
        let mut config = Config::default();
        config.observer.recent_window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.observer.recent_window = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_attempts_and_temperature() {
        let mut config = Config::default();
        config.generation.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [generation]
            provider = "ollama"

            [observer]
            history_window = 50
            recent_window = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.provider, Provider::Ollama);
        assert_eq!(config.generation.endpoint(), DEFAULT_OLLAMA_URL);
        assert_eq!(config.generation.model(), DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.observer.history_window, 50);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.generation.max_jitter_ms = 0;
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn test_write_target_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("studybuddy.toml");
        let config = Config::default();

        let target = config.write_target(Some(&explicit)).unwrap();
        assert_eq!(target, explicit);

        config.save(&target).unwrap();
        assert_eq!(Config::load_from_file(&target).unwrap(), config);

        assert_eq!(config.write_target(None), Config::default_path());
    }

    #[test]
    fn test_settings_carry_retry_policy() {
        let mut config = Config::default();
        config.generation.api_key_env = "STUDYBUDDY_TEST_UNSET_KEY".to_string();
        config.generation.max_attempts = 5;

        let settings = config.generation.to_settings();
        assert_eq!(settings.retry.max_attempts(), 5);
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.endpoint, DEFAULT_GEMINI_URL);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.studybuddy");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }
}
