//! Configuration
//!
//! JSON settings for the category view. Every field has a default, so an
//! empty object is a valid file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Overrides `language` when set
pub const LANG_ENV: &str = "CATEGORY_TREE_LANG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Locale passed to the category list call
    pub language: String,
    /// Pointer travel before a press turns into a drag
    pub drag_threshold_px: i32,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// No file logging when unset
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    pub max_files: usize,
    pub recent_lines: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            drag_threshold_px: tree_dragdrop::DRAG_THRESHOLD_PX,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "category-tree".to_string(),
            max_files: 7,
            recent_lines: 200,
        }
    }
}

impl TreeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?.with_env_overrides();
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_language_override(std::env::var(LANG_ENV).ok())
    }

    fn with_language_override(mut self, language: Option<String>) -> Self {
        if let Some(lang) = language.filter(|l| !l.trim().is_empty()) {
            self.language = lang.trim().to_string();
        }
        self
    }
}
