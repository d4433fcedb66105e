#![forbid(unsafe_code)]

//! Boundary between the package loader and the verifier
//!
//! Patterns are checked against the base path before anything is loaded; the
//! loader's output is then keyed by canonical import path, which both removes
//! duplicates and fixes the order packages are verified in.

use crate::engine::loader::PackageLoader;
use crate::error::{ConfigError, VerifyError};
use crate::types::{BasePath, Package};
use std::collections::BTreeMap;
use std::path::Path;

/// Ensure every pattern is the base itself or lies below it
pub fn validate_patterns(base: &BasePath, patterns: &[String]) -> Result<(), ConfigError> {
    if patterns.is_empty() {
        return Err(ConfigError::MissingField("package patterns".to_string()));
    }

    let prefix = base.descendant_prefix();
    for pattern in patterns {
        if pattern != base.as_str() && !pattern.starts_with(&prefix) {
            return Err(ConfigError::PatternOutsideBase {
                pattern: pattern.clone(),
                prefix,
            });
        }
    }
    Ok(())
}

/// Validate `patterns` and load the matching packages, keyed by import path
pub fn load_packages(
    base: &BasePath,
    loader: &dyn PackageLoader,
    dir: &Path,
    patterns: &[String],
) -> Result<BTreeMap<String, Package>, VerifyError> {
    validate_patterns(base, patterns)?;

    let packages = loader.load(dir, patterns)?;
    tracing::debug!(count = packages.len(), "loaded packages");

    Ok(packages
        .into_iter()
        .map(|pkg| (pkg.path.clone(), pkg))
        .collect())
}
