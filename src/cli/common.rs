//! Common helpers for the command line: configuration merging and logging

use crate::cli::args::Cli;
use crate::config::{CONFIG_FILE_NAME, ColorOption, Config, OutputFormat};
use crate::error::ConfigError;
use crate::types::BasePath;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Effective settings after merging the config file and the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base: BasePath,
    pub dir: PathBuf,
    pub patterns: Vec<String>,
    pub packages_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub color: ColorOption,
    pub max_displayed: usize,
}

impl Settings {
    /// Merge `config` with `cli`; command-line values win
    ///
    /// Relative paths are resolved against `cwd`.
    pub fn resolve(cli: &Cli, config: Config, cwd: &Path) -> Result<Self, ConfigError> {
        let base = match &cli.base {
            Some(base) => BasePath::new(base.as_str())
                .ok_or_else(|| ConfigError::Validation("--base must not be empty".to_string()))?,
            None => config
                .verify
                .base
                .ok_or_else(|| ConfigError::MissingField("--base".to_string()))?,
        };

        let patterns = if cli.patterns.is_empty() {
            config.verify.patterns
        } else {
            cli.patterns.clone()
        };
        if patterns.is_empty() {
            return Err(ConfigError::MissingField("package patterns".to_string()));
        }

        let dir = match cli.dir.clone().or(config.verify.dir) {
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };
        let packages_file = cli
            .packages_file
            .clone()
            .or(config.verify.packages_file)
            .map(|path| cwd.join(path));

        Ok(Settings {
            base,
            dir,
            patterns,
            packages_file,
            format: cli.format.map(Into::into).unwrap_or(config.output.format),
            color: cli.color.map(Into::into).unwrap_or(config.output.color),
            max_displayed: cli
                .max_displayed
                .map(|n| n as usize)
                .unwrap_or(config.output.max_displayed),
        })
    }
}

/// Load the configuration file
///
/// An explicit path must exist. Without one, `verify-imports.toml` in `cwd`
/// is used when present, and defaults otherwise.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return Config::load(cwd.join(path));
    }

    let default_path = cwd.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        tracing::debug!(path = %default_path.display(), "using configuration file");
        return Config::load(default_path);
    }
    Ok(Config::default())
}

/// Install the stderr tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise warnings only, or debug output with
/// `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
