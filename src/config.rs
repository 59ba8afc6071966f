use serde::Deserialize;
use thiserror::Error;

use crate::delay_manager::DelayPolicy;

pub const MIN_PAGES: u32 = 1;
pub const MAX_PAGES: u32 = 5;
pub const DEFAULT_PAGES: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please fill in the API Key.")]
    MissingApiKey,
    #[error("Please fill in the Custom Search Engine ID.")]
    MissingEngineId,
    #[error("Please fill in the {0}.")]
    MissingKeyword(&'static str),
}

/// Mode-specific inputs as the presentation layer collected them.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeInput {
    Trainer {
        technology: String,
        #[serde(default)]
        related_tools: String,
        #[serde(default)]
        location: String,
    },
    Profile {
        keywords: String,
    },
}

/// Everything one run needs, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub api_key: String,
    pub engine_id: String,
    #[serde(flatten)]
    pub mode: ModeInput,
    #[serde(default = "default_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub delay: DelayPolicy,
}

fn default_pages() -> u32 {
    DEFAULT_PAGES
}

/// A config whose required fields are present and trimmed. The pipeline only
/// accepts this type.
#[derive(Debug, Clone)]
pub struct ValidScan {
    pub api_key: String,
    pub engine_id: String,
    pub mode: ModeInput,
    pub max_pages: u32,
    pub delay: DelayPolicy,
}

fn required(value: &str, err: ConfigError) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(err)
    } else {
        Ok(value.to_string())
    }
}

impl ScanConfig {
    pub fn validate(self) -> Result<ValidScan, ConfigError> {
        let api_key = required(&self.api_key, ConfigError::MissingApiKey)?;
        let engine_id = required(&self.engine_id, ConfigError::MissingEngineId)?;

        let mode = match self.mode {
            ModeInput::Trainer {
                technology,
                related_tools,
                location,
            } => ModeInput::Trainer {
                technology: required(&technology, ConfigError::MissingKeyword("Technology"))?,
                related_tools: related_tools.trim().to_string(),
                location: location.trim().to_string(),
            },
            ModeInput::Profile { keywords } => ModeInput::Profile {
                keywords: required(&keywords, ConfigError::MissingKeyword("Search Keywords"))?,
            },
        };

        Ok(ValidScan {
            api_key,
            engine_id,
            mode,
            max_pages: self.max_pages.clamp(MIN_PAGES, MAX_PAGES),
            delay: self.delay,
        })
    }
}
