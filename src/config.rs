//! Configuration types for the assistant session core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Remote chat endpoint settings.
    pub chat: ChatConfig,
    /// Speech capture/synthesis settings.
    pub voice: VoiceConfig,
    /// Image verdict endpoint settings.
    pub scan: ScanConfig,
}

/// Remote chat endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the chat backend. The client POSTs to `{base_url}/api/chat`.
    pub base_url: String,
    /// Upper bound on a single chat request in milliseconds.
    ///
    /// A request that exceeds this resolves to the fallback turn instead of
    /// leaving the session stuck awaiting a reply.
    pub request_timeout_ms: u64,
    /// Assistant turn appended when the chat request fails.
    pub fallback_message: String,
    /// Maximum number of prior turns included in the request history
    /// (0 = unlimited).
    pub max_history_turns: usize,
    /// Whether the fallback turn is spoken on voice-originated failures.
    ///
    /// The successful-reply path always speaks in voice mode; the failure
    /// path is a policy choice and defaults to silent.
    pub speak_fallback: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            request_timeout_ms: 30_000,
            fallback_message: "Connection error. Please try again.".to_owned(),
            max_history_turns: 0,
            speak_fallback: false,
        }
    }
}

impl ChatConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Speech capture and synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language tag for recognition.
    pub language: String,
    /// Synthesis speaking rate (1.0 = platform default pace).
    pub rate: f32,
    /// Synthesis pitch (1.0 = neutral).
    pub pitch: f32,
    /// Synthesis volume in [0.0, 1.0].
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_owned(),
            rate: 1.1,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Image verdict endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Base URL of the scan backend. The client POSTs to `{base_url}/api/scan`.
    pub base_url: String,
    /// Upper bound on a single scan request in milliseconds.
    ///
    /// Verdicts come from a generative model upstream, so this is generous.
    pub request_timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_owned(),
            request_timeout_ms: 60_000,
        }
    }
}

impl ScanConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl AssistConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::AssistError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AssistError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/authenex-assist/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("authenex-assist")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("authenex-assist")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/authenex-assist/config.toml")
        }
    }
}
