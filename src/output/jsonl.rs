#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in report order:
//! 1. One violation record per violation (every violation, no display cap)
//! 2. One status record

use crate::engine::verifier::Report;
use serde::Serialize;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the report as JSONL
    pub fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        for package in &report.failed {
            for violation in &package.violations {
                let record = ViolationRecord {
                    record_type: "violation",
                    package: &package.package,
                    import: violation.import.as_deref(),
                    reason: violation.reason.tag(),
                    message: violation.to_string(),
                    rule_index: violation.rule.as_ref().map(|r| r.index),
                    selector: violation.rule.as_ref().map(|r| r.selector.as_str()),
                };
                if let Ok(json) = serde_json::to_string(&record) {
                    output.push_str(&json);
                    output.push('\n');
                }
            }
        }

        let status = StatusRecord {
            record_type: "status",
            passed: report.passed(),
            packages_checked: report.packages_checked as u64,
            packages_failed: report.packages_failed() as u64,
            total_violations: report.total_violations() as u64,
        };
        if let Ok(json) = serde_json::to_string(&status) {
            output.push_str(&json);
            output.push('\n');
        }

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Violation record for JSONL output
#[derive(Debug, Serialize)]
struct ViolationRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    package: &'a str,
    import: Option<&'a str>,
    reason: &'static str,
    message: String,
    rule_index: Option<usize>,
    selector: Option<&'a str>,
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    packages_checked: u64,
    packages_failed: u64,
    total_violations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::verifier::PackageReport;
    use crate::error::ResolveError;
    use crate::rules::{RuleRef, Violation};
    use std::path::PathBuf;

    fn sample_report() -> Report {
        let rule = RuleRef {
            index: 1,
            selector: "a/b".to_string(),
        };
        Report {
            packages_checked: 5,
            failed: vec![
                PackageReport {
                    package: "example.com/proj/a".to_string(),
                    violations: vec![
                        Violation::forbidden_prefix("a/b/ok/bad/x", rule.clone(), "a/b/ok/bad"),
                        Violation::no_allowed_prefix_match("a/b/other", rule),
                    ],
                },
                PackageReport {
                    package: "example.com/proj/b".to_string(),
                    violations: vec![Violation::resolution(ResolveError::NotADirectory {
                        dir: PathBuf::from("/src/proj/b"),
                    })],
                },
            ],
        }
    }

    #[test]
    fn test_jsonl_empty_report() {
        let output = JsonlFormatter::new().format(&Report::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let status: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(status["type"], "status");
        assert_eq!(status["passed"], true);
        assert_eq!(status["total_violations"], 0);
    }

    #[test]
    fn test_jsonl_violation_records() {
        let output = JsonlFormatter::new().format(&sample_report());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "violation");
        assert_eq!(first["package"], "example.com/proj/a");
        assert_eq!(first["import"], "a/b/ok/bad/x");
        assert_eq!(first["reason"], "forbidden-prefix");
        assert_eq!(first["rule_index"], 1);
        assert_eq!(first["selector"], "a/b");

        let resolution: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(resolution["reason"], "resolution-error");
        assert!(resolution["import"].is_null());
        assert!(resolution["rule_index"].is_null());

        let status: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(status["passed"], false);
        assert_eq!(status["packages_checked"], 5);
        assert_eq!(status["packages_failed"], 2);
        assert_eq!(status["total_violations"], 3);
    }

    #[test]
    fn test_jsonl_valid_json() {
        let output = JsonlFormatter::new().format(&sample_report());
        for line in output.lines() {
            let parsed: Result<serde_json::Value, _> = serde_json::from_str(line);
            assert!(parsed.is_ok(), "Invalid JSON: {}", line);
        }
    }
}
