//! CLI argument parsing using clap

use crate::config::{ColorOption, OutputFormat as ConfigOutputFormat};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl From<OutputFormat> for ConfigOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => ConfigOutputFormat::Human,
            OutputFormat::Jsonl => ConfigOutputFormat::Jsonl,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<ColorChoice> for ColorOption {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorOption::Auto,
            ColorChoice::Always => ColorOption::Always,
            ColorChoice::Never => ColorOption::Never,
        }
    }
}

/// verify-imports command line
#[derive(Parser, Debug)]
#[command(name = "verify-imports")]
#[command(about = "Verify that package imports obey per-directory .import-restrictions rules")]
#[command(version)]
#[command(
    after_help = "Example:\n  verify-imports --base github.com/me/myproject github.com/me/myproject/cmd/... github.com/me/myproject/pkg/..."
)]
pub struct Cli {
    /// Base package path (for example: github.com/me/myproject)
    #[arg(long)]
    pub base: Option<String>,

    /// The module directory (contains go.mod, defaults to the working directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Package patterns to verify; each must equal or start with the base
    pub patterns: Vec<String>,

    /// Configuration file (defaults to verify-imports.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read packages from a JSON file instead of running `go list`
    #[arg(long)]
    pub packages_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output coloring
    #[arg(long)]
    pub color: Option<ColorChoice>,

    /// Violations listed per package before summarizing
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_displayed: Option<u64>,

    /// Log rule-file loading and other progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_verify_cli() {
        // Verify that the CLI struct is properly configured
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minimal_args() {
        let cli = Cli::parse_from([
            "verify-imports",
            "--base",
            "example.com/proj",
            "example.com/proj/...",
        ]);
        assert_eq!(cli.base.as_deref(), Some("example.com/proj"));
        assert_eq!(cli.patterns, vec!["example.com/proj/..."]);
        assert!(cli.dir.is_none());
        assert!(cli.format.is_none());
        assert!(cli.color.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_multiple_patterns_and_dir() {
        let cli = Cli::parse_from([
            "verify-imports",
            "--base",
            "example.com/proj",
            "--dir",
            "/src/proj",
            "example.com/proj/cmd/...",
            "example.com/proj/pkg/...",
        ]);
        assert_eq!(cli.dir, Some(PathBuf::from("/src/proj")));
        assert_eq!(cli.patterns.len(), 2);
    }

    #[test]
    fn test_format_and_color() {
        let cli = Cli::parse_from(["verify-imports", "-f", "jsonl", "--color", "never"]);
        assert_eq!(cli.format, Some(OutputFormat::Jsonl));
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert_eq!(ConfigOutputFormat::from(OutputFormat::Jsonl), ConfigOutputFormat::Jsonl);
        assert_eq!(ColorOption::from(ColorChoice::Never), ColorOption::Never);
    }

    #[test]
    fn test_max_displayed_must_be_positive() {
        assert!(Cli::try_parse_from(["verify-imports", "--max-displayed", "0"]).is_err());
        let cli = Cli::parse_from(["verify-imports", "--max-displayed", "3"]);
        assert_eq!(cli.max_displayed, Some(3));
    }

    #[test]
    fn test_packages_file_and_config() {
        let cli = Cli::parse_from([
            "verify-imports",
            "--config",
            "ci/verify-imports.toml",
            "--packages-file",
            "packages.json",
            "-v",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("ci/verify-imports.toml")));
        assert_eq!(cli.packages_file, Some(PathBuf::from("packages.json")));
        assert!(cli.verbose);
    }
}
