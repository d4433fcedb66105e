//! Test utilities for verify-imports integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const BASE: &str = "example.com/proj";

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// One rule as (selector, allowed prefixes, forbidden prefixes)
pub type RuleFixture<'a> = (&'a str, &'a [&'a str], &'a [&'a str]);

/// Render a rule file document
pub fn rules_json(rules: &[RuleFixture]) -> String {
    let rules: Vec<serde_json::Value> = rules
        .iter()
        .map(|(selector, allowed, forbidden)| {
            serde_json::json!({
                "SelectorRegexp": selector,
                "AllowedPrefixes": allowed,
                "ForbiddenPrefixes": forbidden,
            })
        })
        .collect();
    serde_json::json!({ "Rules": rules }).to_string()
}

/// Create `root/relative` and write a rule file into it
pub fn write_rule_file(root: &Path, relative: &str, rules: &[RuleFixture]) -> PathBuf {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(".import-restrictions");
    fs::write(&path, rules_json(rules)).unwrap();
    path
}

/// Create package directories below `root`
pub fn create_dirs(root: &Path, relatives: &[&str]) {
    for relative in relatives {
        fs::create_dir_all(root.join(relative)).unwrap();
    }
}

/// Write a packages file in `go list -json` shape
pub fn write_packages_file(root: &Path, name: &str, packages: &[(&str, &[&str])]) -> PathBuf {
    let records: Vec<serde_json::Value> = packages
        .iter()
        .map(|(path, imports)| serde_json::json!({ "ImportPath": path, "Imports": imports }))
        .collect();
    let path = root.join(name);
    fs::write(&path, serde_json::Value::Array(records).to_string()).unwrap();
    path
}
