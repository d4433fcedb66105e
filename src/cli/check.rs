//! Check command implementation
//!
//! This module implements the `verify-imports` run, which:
//! - Loads verify-imports.toml (if any) and merges it with the command line
//! - Validates the package patterns against the base path
//! - Loads packages through `go list` or a packages file
//! - Verifies every package against its governing rule file
//! - Prints the report and returns the exit code

use crate::cli::args::Cli;
use crate::cli::common::{EXIT_FAILURE, EXIT_SUCCESS, Settings, load_config};
use crate::config::{ColorOption, OutputFormat};
use crate::engine::{GoListLoader, PackageLoader, PackagesFileLoader, Report, Verifier};
use crate::error::VerifyError;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::RuleStore;
use std::io::{self, IsTerminal, Write};
use termcolor::StandardStream;

/// Run the check
///
/// # Returns
///
/// Exit code:
/// - 0: no violations
/// - 1: violations found, or a configuration/loading error
pub fn run_check(cli: &Cli) -> i32 {
    match run_check_inner(cli) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => {
            eprintln!("verify imports: some packages violate import rules");
            EXIT_FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Internal implementation of the check
fn run_check_inner(cli: &Cli) -> Result<bool, VerifyError> {
    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;
    let settings = Settings::resolve(cli, config, &cwd)?;

    let loader: Box<dyn PackageLoader> = match &settings.packages_file {
        Some(path) => Box::new(PackagesFileLoader::new(path.clone())),
        None => Box::new(GoListLoader::new()),
    };

    let report = verify(&settings, loader.as_ref())?;
    print_report(&report, &settings)?;
    Ok(report.passed())
}

/// Load packages and verify them against the rule files under `settings.dir`
pub fn verify(settings: &Settings, loader: &dyn PackageLoader) -> Result<Report, VerifyError> {
    let store = RuleStore::on_disk(settings.base.clone(), &settings.dir);
    let mut verifier = Verifier::new(store);
    let loaded = verifier.load_packages(loader, &settings.dir, &settings.patterns)?;
    tracing::debug!(packages = loaded, base = %settings.base, "verifying packages");
    Ok(verifier.verify())
}

/// Print the report to stdout in the configured format
fn print_report(report: &Report, settings: &Settings) -> io::Result<()> {
    match settings.format {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(color_choice(settings.color));
            HumanFormatter::with_max_displayed(settings.max_displayed).write(report, &mut stdout)?;
            stdout.flush()
        }
        OutputFormat::Jsonl => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(JsonlFormatter::new().format(report).as_bytes())?;
            stdout.flush()
        }
    }
}

fn color_choice(option: ColorOption) -> termcolor::ColorChoice {
    match option {
        ColorOption::Always => termcolor::ColorChoice::Always,
        ColorOption::Never => termcolor::ColorChoice::Never,
        ColorOption::Auto if io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorOption::Auto => termcolor::ColorChoice::Never,
    }
}
