use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SikkimError};

/// Top-level configuration for the Sikkim travel assistant.
///
/// Loaded from `~/.sikkim/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SikkimConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SikkimConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SikkimConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SikkimError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat widget configuration.
///
/// The delays only shape how replies are paced for the reader; they carry no
/// ordering guarantees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Language id selected when a session starts.
    pub default_language: String,
    /// Delay before a submitted message is processed.
    pub reply_delay_ms: u64,
    /// Base time the typing indicator is shown before a reply lands.
    pub typing_delay_ms: u64,
    /// Upper bound of the random extra typing time.
    pub typing_jitter_ms: u64,
    /// Delay before the unsolicited welcome greeting.
    pub welcome_delay_ms: u64,
    /// Gap between the welcome greeting and the introduction that follows it.
    pub welcome_followup_delay_ms: u64,
    /// Capacity of the session event broadcast channel.
    pub event_capacity: usize,
    /// Optional path to a replacement language catalog (JSON).
    pub catalog_path: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_language: "english".to_string(),
            reply_delay_ms: 500,
            typing_delay_ms: 1000,
            typing_jitter_ms: 1000,
            welcome_delay_ms: 2000,
            welcome_followup_delay_ms: 1000,
            event_capacity: 256,
            catalog_path: None,
        }
    }
}

impl ChatConfig {
    /// Fixed part of the reply delay (processing + typing).
    pub fn base_reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms.saturating_add(self.typing_delay_ms))
    }

    pub fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }

    pub fn welcome_followup_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_followup_delay_ms)
    }
}
