#![forbid(unsafe_code)]

//! Rule-file resolution with per-package caching
//!
//! The rule store finds the rule file governing a package by checking the
//! package directory and then each ancestor directory up to the base path.
//! Every outcome is cached by package path, including "no rule file" and
//! failures, so a walk never repeats for the same package.
//!
//! Filesystem access goes through the [`RuleFiles`] trait so resolution can be
//! exercised against an in-memory tree.

use crate::error::ResolveError;
use crate::rules::matcher::RuleSet;
use crate::rules::rule::{RULE_FILE_NAME, parse_rules};
use crate::types::{BasePath, parent_package};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of resolving one package: the governing rules, or None
pub type Resolution = Result<Option<Arc<RuleSet>>, ResolveError>;

/// Filesystem capability used by the rule store
pub trait RuleFiles {
    /// Whether `path` is a directory
    ///
    /// Returns an error if the path does not exist or cannot be inspected.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Read the file at `path`, or None if it does not exist
    fn read_file(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Rule files read from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskRuleFiles;

impl RuleFiles for DiskRuleFiles {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::metadata(path)?.is_dir())
    }

    fn read_file(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory directory tree with an access counter
///
/// Every call through [`RuleFiles`] increments the counter, which is shared
/// with handles returned by [`MemoryRuleFiles::access_counter`].
#[derive(Debug, Default, Clone)]
pub struct MemoryRuleFiles {
    dirs: HashSet<PathBuf>,
    files: HashMap<PathBuf, String>,
    accesses: Arc<AtomicUsize>,
}

impl MemoryRuleFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and all of its ancestors
    pub fn add_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        let mut current = Some(dir.as_ref());
        while let Some(path) = current {
            if path.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(path.to_path_buf());
            current = path.parent();
        }
        self
    }

    /// Add a file, creating its parent directories
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> &mut Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path.to_path_buf(), content.into());
        self
    }

    /// Add a rule file inside `dir`
    pub fn add_rule_file(&mut self, dir: impl AsRef<Path>, content: impl Into<String>) -> &mut Self {
        let path = dir.as_ref().join(RULE_FILE_NAME);
        self.add_file(path, content)
    }

    /// Shared handle on the number of filesystem accesses made so far
    pub fn access_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.accesses)
    }
}

impl RuleFiles for MemoryRuleFiles {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        if self.dirs.contains(path) {
            Ok(true)
        } else if self.files.contains_key(path) {
            Ok(false)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no such file or directory",
            ))
        }
    }

    fn read_file(&self, path: &Path) -> io::Result<Option<String>> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.get(path).cloned())
    }
}

/// Memoizing resolver from package path to governing rule set
pub struct RuleStore {
    base: BasePath,
    root: PathBuf,
    files: Box<dyn RuleFiles>,
    cache: HashMap<String, Resolution>,
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("base", &self.base)
            .field("root", &self.root)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl RuleStore {
    /// Creates a store for packages under `base`, whose directory is `root`
    pub fn new(base: BasePath, root: impl Into<PathBuf>, files: Box<dyn RuleFiles>) -> Self {
        RuleStore {
            base,
            root: root.into(),
            files,
            cache: HashMap::new(),
        }
    }

    /// Creates a store reading rule files from disk
    pub fn on_disk(base: BasePath, root: impl Into<PathBuf>) -> Self {
        Self::new(base, root, Box::new(DiskRuleFiles))
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Number of package paths with a cached resolution
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Directory of a package inside the base, or None outside of it
    pub fn package_dir(&self, package: &str) -> Option<PathBuf> {
        let relative = self.base.relative(package)?;
        if relative.is_empty() {
            Some(self.root.clone())
        } else {
            Some(self.root.join(relative))
        }
    }

    /// Resolve the rule set governing `package`
    ///
    /// Packages outside the base resolve to `Ok(None)` without touching the
    /// filesystem. The base path itself is the last directory checked.
    pub fn resolve(&mut self, package: &str) -> Resolution {
        let Some(dir) = self.package_dir(package) else {
            return Ok(None);
        };

        if let Some(cached) = self.cache.get(package) {
            return cached.clone();
        }

        let resolution = self.resolve_uncached(package, &dir);
        self.cache.insert(package.to_string(), resolution.clone());
        resolution
    }

    fn resolve_uncached(&mut self, package: &str, dir: &Path) -> Resolution {
        match self.files.is_dir(dir) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ResolveError::NotADirectory {
                    dir: dir.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(ResolveError::DirectoryNotFound {
                    dir: dir.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }

        let path = dir.join(RULE_FILE_NAME);
        let content = self.files.read_file(&path).map_err(|e| ResolveError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if let Some(content) = content {
            let rules = parse_rules(&content).map_err(|e| ResolveError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!(
                package,
                file = %path.display(),
                rules = rules.len(),
                "loaded rules"
            );
            return Ok(Some(Arc::new(RuleSet::new(package, path, rules))));
        }

        if package == self.base.as_str() {
            return Ok(None);
        }

        match parent_package(package) {
            Some(parent) => {
                let parent = parent.to_string();
                self.resolve(&parent)
            }
            None => Ok(None),
        }
    }
}
