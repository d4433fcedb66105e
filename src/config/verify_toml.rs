//! Parsing and validation for verify-imports.toml configuration files
//!
//! Every setting is optional; values given on the command line take
//! precedence over the file.

use crate::error::ConfigError;
use crate::output::DEFAULT_MAX_DISPLAYED;
use crate::types::BasePath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "verify-imports.toml";

/// Main configuration struct for verify-imports.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// What to verify
    #[serde(default)]
    pub verify: VerifySection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.output.max_displayed == 0 {
            return Err(ConfigError::Validation(
                "output.max_displayed must be at least 1".to_string(),
            ));
        }

        if self.verify.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "verify.patterns must not contain empty patterns".to_string(),
            ));
        }

        Ok(())
    }
}

/// The `[verify]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifySection {
    /// Base import path of the checked tree
    #[serde(default)]
    pub base: Option<BasePath>,

    /// Module directory holding the base package
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Package patterns to verify
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Read packages from this JSON file instead of running `go list`
    #[serde(default)]
    pub packages_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,

    /// Violations listed per package before summarizing
    #[serde(default = "default_max_displayed")]
    pub max_displayed: usize,
}

fn default_max_displayed() -> usize {
    DEFAULT_MAX_DISPLAYED
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorOption::Auto,
            max_displayed: DEFAULT_MAX_DISPLAYED,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
