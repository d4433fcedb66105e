#![forbid(unsafe_code)]

//! Verification of loaded packages against their governing rules
//!
//! Packages are verified in import-path order. Rule resolution runs first and
//! sequentially, since the rule store's cache is the only mutable state; the
//! resolved packages are then matched in parallel with rayon and collected in
//! the same order, so the report is identical from run to run.

use crate::engine::adapter::load_packages;
use crate::engine::loader::PackageLoader;
use crate::error::VerifyError;
use crate::rules::{Resolution, RuleStore, Violation};
use crate::types::Package;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Violations found in one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Canonical import path of the package
    pub package: String,
    /// Every violation, in rule order then import order
    pub violations: Vec<Violation>,
}

/// Complete result of a verification run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of packages verified
    pub packages_checked: usize,
    /// Packages with at least one violation, sorted by import path
    pub failed: Vec<PackageReport>,
}

impl Report {
    /// True when no package produced a violation
    pub fn passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn packages_failed(&self) -> usize {
        self.failed.len()
    }

    pub fn total_violations(&self) -> usize {
        self.failed.iter().map(|p| p.violations.len()).sum()
    }
}

/// Verifies a set of packages against the rules found by a [`RuleStore`]
///
/// Each verifier owns its store, so the rule cache lives exactly as long as
/// one verification session.
#[derive(Debug)]
pub struct Verifier {
    store: RuleStore,
    packages: BTreeMap<String, Package>,
}

impl Verifier {
    pub fn new(store: RuleStore) -> Self {
        Verifier {
            store,
            packages: BTreeMap::new(),
        }
    }

    /// Load packages through `loader` after validating the patterns
    ///
    /// Returns the number of packages loaded by this call.
    pub fn load_packages(
        &mut self,
        loader: &dyn PackageLoader,
        dir: &Path,
        patterns: &[String],
    ) -> Result<usize, VerifyError> {
        let loaded = load_packages(self.store.base(), loader, dir, patterns)?;
        let count = loaded.len();
        self.packages.extend(loaded);
        Ok(count)
    }

    /// Add already-loaded packages
    pub fn add_packages(&mut self, packages: impl IntoIterator<Item = Package>) {
        self.packages
            .extend(packages.into_iter().map(|pkg| (pkg.path.clone(), pkg)));
    }

    /// Packages to verify, in import-path order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Verify a single package
    pub fn verify_package(&mut self, package: &Package) -> Vec<Violation> {
        let resolution = self.store.resolve(&package.path);
        check_package(package, &resolution)
    }

    /// Verify every package and build the complete report
    pub fn verify(&mut self) -> Report {
        let store = &mut self.store;
        let resolved: Vec<(&Package, Resolution)> = self
            .packages
            .values()
            .map(|pkg| (pkg, store.resolve(&pkg.path)))
            .collect();

        let failed: Vec<PackageReport> = resolved
            .par_iter()
            .map(|(pkg, resolution)| PackageReport {
                package: pkg.path.clone(),
                violations: check_package(pkg, resolution),
            })
            .filter(|report| !report.violations.is_empty())
            .collect();

        let report = Report {
            packages_checked: resolved.len(),
            failed,
        };
        tracing::info!(
            packages = report.packages_checked,
            failed = report.packages_failed(),
            violations = report.total_violations(),
            "verification finished"
        );
        report
    }
}

/// Violations of one package given its resolved rules
///
/// No rule file means no policy: the package is compliant.
fn check_package(package: &Package, resolution: &Resolution) -> Vec<Violation> {
    match resolution {
        Err(error) => vec![Violation::resolution(error.clone())],
        Ok(None) => Vec::new(),
        Ok(Some(rules)) => rules.check(&package.imports),
    }
}
