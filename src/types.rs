#![forbid(unsafe_code)]

//! Core domain types for verify-imports
//!
//! This module defines the package record handed over by the loader and the
//! base path that bounds the checker's jurisdiction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A loaded package: canonical import path, on-disk location and imports
///
/// Imports are kept in a `BTreeSet` so they are distinct and iterate in
/// sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Canonical import path (e.g. `github.com/me/proj/pkg/api`)
    pub path: String,

    /// Directory containing the package sources, when the loader knows it
    pub dir: Option<PathBuf>,

    /// Distinct import paths referenced by the package
    pub imports: BTreeSet<String>,
}

impl Package {
    /// Creates a package from its path and imports
    pub fn new<I, S>(path: impl Into<String>, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Package {
            path: path.into(),
            dir: None,
            imports: imports.into_iter().map(Into::into).collect(),
        }
    }
}

/// The base import path of the checked tree
///
/// Stored without a trailing slash. A package is inside the base (in its
/// jurisdiction) when it equals the base or starts with `base + "/"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BasePath(String);

impl BasePath {
    /// Creates a BasePath, trimming trailing slashes
    ///
    /// Returns None if the path is empty after trimming.
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let mut path = path.into();
        while path.ends_with('/') {
            path.pop();
        }
        if path.is_empty() {
            return None;
        }
        Some(BasePath(path))
    }

    /// Returns the base path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the base followed by a separator (`base/`)
    pub fn descendant_prefix(&self) -> String {
        format!("{}/", self.0)
    }

    /// Whether `path` is the base itself or one of its descendants
    pub fn contains(&self, path: &str) -> bool {
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Path of `path` relative to the base, without a leading slash
    ///
    /// Returns `Some("")` for the base itself and None outside the base.
    pub fn relative<'a>(&self, path: &'a str) -> Option<&'a str> {
        if !self.contains(path) {
            return None;
        }
        Some(path[self.0.len()..].trim_start_matches('/'))
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BasePath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BasePath::new(value).ok_or_else(|| "base path must not be empty".to_string())
    }
}

impl From<BasePath> for String {
    fn from(base: BasePath) -> Self {
        base.0
    }
}

/// Parent of a slash-separated package path, if it has one
pub fn parent_package(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}
