//! verify-imports CLI entry point

use clap::Parser;
use import_restrictions::cli::args::Cli;
use import_restrictions::cli::common::{EXIT_FAILURE, EXIT_SUCCESS, init_logging};
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            process::exit(if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS });
        }
    };

    init_logging(cli.verbose);
    process::exit(import_restrictions::cli::check::run_check(&cli));
}
