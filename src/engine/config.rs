// Configuration for the dynread engine and UI components.
// Loaded from ${DYNREAD_HOME}/config.toml; every field has a default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::error::ReaderError;

/// Pacing configuration used by the word-reveal scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct PacerConfig {
    /// Newlines placed before and after the words in the display buffer (default 20)
    pub margin_lines: usize,

    /// Poll interval while paused (default 100ms)
    pub pause_poll: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            margin_lines: Config::DEFAULT_MARGIN_LINES,
            pause_poll: Duration::from_millis(Config::DEFAULT_PAUSE_POLL_MS),
        }
    }
}

/// Generation configuration for the text provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: Option<String>,
    /// Language the story is requested in
    pub language: String,
    pub request_timeout: Duration,
}

/// Master configuration as stored in config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini model name
    pub model: String,

    /// Optional Gemini API base URL (for proxies or test rigs)
    pub gemini_base_url: Option<String>,

    pub language: String,

    pub margin_lines: usize,

    pub pause_poll_ms: u64,

    /// Timeout for a single generation request in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    const DEFAULT_MODEL: &'static str = "gemini-pro";
    const DEFAULT_LANGUAGE: &'static str = "English";
    const DEFAULT_MARGIN_LINES: usize = 20;
    const DEFAULT_PAUSE_POLL_MS: u64 = 100;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ReaderError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ReaderError::io(path, e))?;
        toml::from_str(&contents).map_err(|source| ReaderError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn pacer(&self) -> PacerConfig {
        PacerConfig {
            margin_lines: self.margin_lines,
            pause_poll: Duration::from_millis(self.pause_poll_ms.max(1)),
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model.clone(),
            base_url: self.gemini_base_url.clone(),
            language: self.language.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            gemini_base_url: None,
            language: Self::DEFAULT_LANGUAGE.to_string(),
            margin_lines: Self::DEFAULT_MARGIN_LINES,
            pause_poll_ms: Self::DEFAULT_PAUSE_POLL_MS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
