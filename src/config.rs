//! Outplan Configuration Module
//!
//! Config is stored in `~/.config/outplan/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables (`OUTPLAN_TAB_WIDTH`, `OUTPLAN_FORMAT`, `OUTPLAN_STRICT`)
//! 3. Config file
//! 4. Defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OutplanError, Result};
use crate::output::OutputFormat;
use crate::parser::{OutlineParser, DEFAULT_TAB_WIDTH, MAX_TAB_WIDTH};
use crate::planner::Planner;

pub const ENV_TAB_WIDTH: &str = "OUTPLAN_TAB_WIDTH";
pub const ENV_FORMAT: &str = "OUTPLAN_FORMAT";
pub const ENV_STRICT: &str = "OUTPLAN_STRICT";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutplanConfig {
    /// Columns a tab counts for when reading indentation
    pub tab_width: usize,

    /// Default output format
    pub format: OutputFormat,

    /// Fail on dependencies that name unknown items
    pub strict: bool,
}

impl Default for OutplanConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            format: OutputFormat::Text,
            strict: false,
        }
    }
}

impl OutplanConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/outplan/` on Unix, `%APPDATA%/outplan/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("outplan")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| OutplanError::ConfigError {
            reason: format!("Failed to read config file: {}", e),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| OutplanError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })?;
        config.validate()
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Merge with variables from any lookup (environment, tests)
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TAB_WIDTH).filter(|v| !v.is_empty()) {
            self.tab_width = raw.trim().parse().map_err(|_| OutplanError::ConfigError {
                reason: format!("{} must be a positive integer, got '{}'", ENV_TAB_WIDTH, raw),
            })?;
        }

        if let Some(raw) = lookup(ENV_FORMAT).filter(|v| !v.is_empty()) {
            self.format = raw
                .parse()
                .map_err(|reason| OutplanError::ConfigError { reason })?;
        }

        if let Some(raw) = lookup(ENV_STRICT).filter(|v| !v.is_empty()) {
            self.strict = parse_bool(&raw).ok_or_else(|| OutplanError::ConfigError {
                reason: format!("{} must be true or false, got '{}'", ENV_STRICT, raw),
            })?;
        }

        self.validate()
    }

    /// Reject settings the parser cannot use
    pub fn validate(self) -> Result<Self> {
        if self.tab_width == 0 || self.tab_width > MAX_TAB_WIDTH {
            return Err(OutplanError::ConfigError {
                reason: format!(
                    "tab_width must be between 1 and {}, got {}",
                    MAX_TAB_WIDTH, self.tab_width
                ),
            });
        }
        Ok(self)
    }

    /// Outline parser using this config's tab width
    pub fn parser(&self) -> OutlineParser {
        OutlineParser::new(self.tab_width)
    }

    /// Planner using this config's strictness
    pub fn planner(&self) -> Planner {
        Planner::new().strict(self.strict)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
