//! Error types for verify-imports
//!
//! Only configuration and loading errors abort a run. Resolution failures are
//! cached by the rule store and surfaced as violations, so [`ResolveError`]
//! carries rendered messages and is cheap to clone.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid TOML syntax in the configuration file
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// I/O error while reading the configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required configuration value
    #[error("Missing required value: {0}")]
    MissingField(String),

    /// Semantic validation failure
    #[error("{0}")]
    Validation(String),

    /// Package pattern outside of the base path
    #[error("pattern must start with base, but {pattern:?} does not start with {prefix:?}")]
    PatternOutsideBase { pattern: String, prefix: String },
}

/// Errors raised by a package loader
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The loader command could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The loader command exited unsuccessfully
    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The loader output could not be decoded
    #[error("invalid package data from {origin}: {message}")]
    Decode { origin: String, message: String },

    /// I/O error while reading package data
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Pattern could not be interpreted
    #[error("invalid package pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Failure to resolve the rule file governing a package
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Expected package directory does not exist
    #[error("directory {dir:?} not found: {message}")]
    DirectoryNotFound { dir: PathBuf, message: String },

    /// Expected package directory is not a directory
    #[error("not a directory {dir:?}")]
    NotADirectory { dir: PathBuf },

    /// Rule file exists but could not be read
    #[error("failed to read rule file {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    /// Rule file is not a valid rule document
    #[error("failed to parse rule file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Top-level error type for a verification run
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Package loading error
    #[error("load packages: {0}")]
    Load(#[from] LoadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
