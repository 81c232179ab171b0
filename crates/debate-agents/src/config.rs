//! Runner configuration: TOML file, `DEBATE_*` environment overlay, validation.

use std::path::{Path, PathBuf};

use coordination::DebateConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while loading the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{side} endpoint has an empty {field}")]
    InvalidEndpoint { side: &'static str, field: &'static str },
}

/// OpenAI-compatible inference endpoint for one debater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL, e.g. `http://localhost:8080/v1`.
    pub url: String,
    pub model: String,
    /// Bearer token; local servers usually need none.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/v1".into(),
            model: "default".into(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

impl EndpointConfig {
    fn apply_env(&mut self, prefix: &str, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(&format!("{prefix}_URL")) {
            self.url = url;
        }
        if let Some(model) = lookup(&format!("{prefix}_MODEL")) {
            self.model = model;
        }
        if let Some(key) = lookup(&format!("{prefix}_API_KEY")) {
            self.api_key = Some(key);
        }
    }

    fn validate(&self, side: &'static str) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidEndpoint { side, field: "url" });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidEndpoint { side, field: "model" });
        }
        Ok(())
    }
}

/// Top-level configuration for the debate runner.
///
/// Precedence: defaults < TOML file < environment < CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debate: DebateConfig,
    pub affirmative: EndpointConfig,
    pub negative: EndpointConfig,
    /// Where transcripts (final and partial) are written.
    pub transcript_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debate: DebateConfig::default(),
            affirmative: EndpointConfig::default(),
            negative: EndpointConfig::default(),
            transcript_dir: PathBuf::from("transcripts"),
        }
    }
}

impl AppConfig {
    /// Load from an optional TOML file, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `DEBATE_*` environment variables.
    pub fn apply_env(&mut self) {
        self.debate.apply_env();
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay endpoint and directory settings from `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.affirmative.apply_env("DEBATE_AFFIRMATIVE", &lookup);
        self.negative.apply_env("DEBATE_NEGATIVE", &lookup);
        if let Some(dir) = lookup("DEBATE_TRANSCRIPT_DIR") {
            self.transcript_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.affirmative.validate("affirmative")?;
        self.negative.validate("negative")
    }
}
