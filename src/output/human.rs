#![forbid(unsafe_code)]

//! Human-readable report output
//!
//! Each failing package is printed as a `Package "<path>"` header followed by
//! its violations, one per tab-indented line. At most `max_displayed`
//! violations are listed per package; beyond that a single summary line gives
//! the true total. The cap only affects what is printed. A passing run prints
//! a blank line and then the success marker.

use crate::engine::verifier::{PackageReport, Report};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

/// Default number of violations listed per package
pub const DEFAULT_MAX_DISPLAYED: usize = 10;

/// Line printed after a run without violations
pub const SUCCESS_MARKER: &str = "✓ ok";

/// Human-readable formatter
#[derive(Debug, Clone, Copy)]
pub struct HumanFormatter {
    max_displayed: usize,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::with_max_displayed(DEFAULT_MAX_DISPLAYED)
    }

    /// Formatter listing at most `max_displayed` violations per package
    pub fn with_max_displayed(max_displayed: usize) -> Self {
        HumanFormatter {
            max_displayed: max_displayed.max(1),
        }
    }

    pub fn max_displayed(&self) -> usize {
        self.max_displayed
    }

    /// Render the report without colors
    pub fn format(&self, report: &Report) -> String {
        let mut buffer = NoColor::new(Vec::new());
        match self.write(report, &mut buffer) {
            Ok(()) => String::from_utf8_lossy(&buffer.into_inner()).into_owned(),
            Err(_) => String::new(),
        }
    }

    /// Write the report, coloring headers when `out` supports it
    pub fn write(&self, report: &Report, out: &mut dyn WriteColor) -> io::Result<()> {
        for package in &report.failed {
            self.write_package(package, out)?;
        }

        if report.passed() {
            writeln!(out)?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "{}", SUCCESS_MARKER)?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_package(&self, package: &PackageReport, out: &mut dyn WriteColor) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "Package {:?}", package.package)?;
        out.reset()?;
        writeln!(out)?;

        for violation in package.violations.iter().take(self.max_displayed) {
            writeln!(out, "\t{}", violation)?;
        }

        let total = package.violations.len();
        if total > self.max_displayed {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, "\t... total {} imports violated", total)?;
            out.reset()?;
            writeln!(out)?;
        }

        writeln!(out)
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}
