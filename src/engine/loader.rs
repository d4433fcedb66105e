#![forbid(unsafe_code)]

//! Package loaders
//!
//! A loader expands package patterns and reports, for each matched package,
//! its import path, directory and imports. [`GoListLoader`] asks the `go`
//! tool; [`PackagesFileLoader`] and [`StaticLoader`] serve pre-computed
//! package lists filtered with the same pattern syntax.

use crate::error::LoadError;
use crate::types::Package;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of package records
pub trait PackageLoader {
    /// Load every package matching one of `patterns`, relative to `dir`
    fn load(&self, dir: &Path, patterns: &[String]) -> Result<Vec<Package>, LoadError>;
}

/// Package record as printed by `go list -json`
///
/// Package list files use the same shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageRecord {
    import_path: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    imports: Option<Vec<String>>,
    #[serde(default)]
    error: Option<PackageRecordError>,
}

#[derive(Debug, Deserialize)]
struct PackageRecordError {
    #[serde(rename = "Err", default)]
    err: String,
}

impl PackageRecord {
    fn into_package(self) -> Package {
        if let Some(error) = &self.error {
            tracing::warn!(
                package = %self.import_path,
                error = %error.err,
                "package loaded with errors"
            );
        }
        Package {
            path: self.import_path,
            dir: self.dir,
            imports: self.imports.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Decode a stream of concatenated JSON package objects
fn decode_package_stream(bytes: &[u8], origin: &str) -> Result<Vec<Package>, LoadError> {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<PackageRecord>()
        .map(|record| {
            record
                .map(PackageRecord::into_package)
                .map_err(|e| LoadError::Decode {
                    origin: origin.to_string(),
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Loads packages by running `go list -e -json`
#[derive(Debug, Clone)]
pub struct GoListLoader {
    program: String,
}

impl GoListLoader {
    pub fn new() -> Self {
        Self::with_program("go")
    }

    /// Use a different `go` executable
    pub fn with_program(program: impl Into<String>) -> Self {
        GoListLoader {
            program: program.into(),
        }
    }
}

impl Default for GoListLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageLoader for GoListLoader {
    fn load(&self, dir: &Path, patterns: &[String]) -> Result<Vec<Package>, LoadError> {
        let command = format!("{} list", self.program);
        tracing::debug!(dir = %dir.display(), ?patterns, "running {}", command);

        let output = Command::new(&self.program)
            .args(["list", "-e", "-json"])
            .args(patterns)
            .current_dir(dir)
            .output()
            .map_err(|source| LoadError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LoadError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        decode_package_stream(&output.stdout, &command)
    }
}

/// A Go-style package pattern
///
/// `...` matches any string; a trailing `/...` also matches the path before it,
/// so `a/...` matches `a` and every package below it.
#[derive(Debug, Clone)]
pub struct PackagePattern {
    raw: String,
    regex: Regex,
}

impl PackagePattern {
    pub fn new(pattern: &str) -> Result<Self, LoadError> {
        let mut expr = regex::escape(pattern).replace(r"\.\.\.", ".*");
        if let Some(stripped) = expr.strip_suffix("/.*") {
            expr = format!("{}(/.*)?", stripped);
        }
        let regex = Regex::new(&format!("^{}$", expr)).map_err(|e| LoadError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(PackagePattern {
            raw: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, package: &str) -> bool {
        self.regex.is_match(package)
    }
}

/// Keep the packages matched by at least one pattern
fn filter_packages(packages: &[Package], patterns: &[String]) -> Result<Vec<Package>, LoadError> {
    let patterns = patterns
        .iter()
        .map(|p| PackagePattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(packages
        .iter()
        .filter(|pkg| patterns.iter().any(|p| p.matches(&pkg.path)))
        .cloned()
        .collect())
}

/// Serves a fixed, in-memory package list
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    packages: Vec<Package>,
}

impl StaticLoader {
    pub fn new(packages: Vec<Package>) -> Self {
        StaticLoader { packages }
    }
}

impl PackageLoader for StaticLoader {
    fn load(&self, _dir: &Path, patterns: &[String]) -> Result<Vec<Package>, LoadError> {
        filter_packages(&self.packages, patterns)
    }
}

/// Reads packages from a JSON file
///
/// The file holds either a JSON array of `go list -json` objects or the
/// concatenated object stream `go list -json` prints. A relative path is
/// resolved against the loader's directory.
#[derive(Debug, Clone)]
pub struct PackagesFileLoader {
    path: PathBuf,
}

impl PackagesFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PackagesFileLoader { path: path.into() }
    }

    fn read(&self, dir: &Path) -> Result<Vec<Package>, LoadError> {
        let path = if self.path.is_absolute() {
            self.path.clone()
        } else {
            dir.join(&self.path)
        };
        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let origin = path.display().to_string();

        match serde_json::from_slice::<Vec<PackageRecord>>(&bytes) {
            Ok(records) => Ok(records.into_iter().map(PackageRecord::into_package).collect()),
            Err(_) => decode_package_stream(&bytes, &origin),
        }
    }
}

impl PackageLoader for PackagesFileLoader {
    fn load(&self, dir: &Path, patterns: &[String]) -> Result<Vec<Package>, LoadError> {
        let packages = self.read(dir)?;
        filter_packages(&packages, patterns)
    }
}
