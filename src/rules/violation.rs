#![forbid(unsafe_code)]

//! Violations reported against a package

use crate::error::ResolveError;
use serde::Serialize;
use std::fmt;

/// Why an import (or a package) violates the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The import starts with a forbidden prefix
    ForbiddenPrefix { prefix: String },

    /// The import starts with none of the allowed prefixes
    NoAllowedPrefixMatch,

    /// The rule's selector is not a valid regular expression
    BadSelector { rule_file: String, error: String },

    /// The governing rule file could not be resolved
    ResolutionError(ResolveError),
}

impl Reason {
    /// Stable tag for machine-readable output
    pub fn tag(&self) -> &'static str {
        match self {
            Reason::ForbiddenPrefix { .. } => "forbidden-prefix",
            Reason::NoAllowedPrefixMatch => "no-allowed-prefix-match",
            Reason::BadSelector { .. } => "bad-selector",
            Reason::ResolutionError(_) => "resolution-error",
        }
    }
}

/// Identifies the rule that produced a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRef {
    /// Zero-based position of the rule in its rule file
    pub index: usize,

    /// The rule's selector pattern as written
    pub selector: String,
}

/// A single reportable failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending import; None for package-level failures
    pub import: Option<String>,

    /// Rule that produced the violation; None for resolution failures
    pub rule: Option<RuleRef>,

    /// What went wrong
    pub reason: Reason,
}

impl Violation {
    /// A selected import starting with a forbidden prefix
    pub fn forbidden_prefix(import: &str, rule: RuleRef, prefix: &str) -> Self {
        Violation {
            import: Some(import.to_string()),
            rule: Some(rule),
            reason: Reason::ForbiddenPrefix {
                prefix: prefix.to_string(),
            },
        }
    }

    /// A selected import matching none of the allowed prefixes
    pub fn no_allowed_prefix_match(import: &str, rule: RuleRef) -> Self {
        Violation {
            import: Some(import.to_string()),
            rule: Some(rule),
            reason: Reason::NoAllowedPrefixMatch,
        }
    }

    /// A rule whose selector does not compile
    pub fn bad_selector(rule: RuleRef, rule_file: &str, error: impl Into<String>) -> Self {
        Violation {
            import: None,
            rule: Some(rule),
            reason: Reason::BadSelector {
                rule_file: rule_file.to_string(),
                error: error.into(),
            },
        }
    }

    /// A package whose rule file could not be resolved
    pub fn resolution(error: ResolveError) -> Self {
        Violation {
            import: None,
            rule: None,
            reason: Reason::ResolutionError(error),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let import = self.import.as_deref().unwrap_or_default();
        match &self.reason {
            Reason::ForbiddenPrefix { prefix } => {
                write!(f, "import {:?} has forbidden prefix {}", import, prefix)
            }
            Reason::NoAllowedPrefixMatch => {
                write!(f, "import {:?} did not match any allowed prefix", import)
            }
            Reason::BadSelector { rule_file, error } => {
                let selector = self.rule.as_ref().map(|r| r.selector.as_str());
                write!(
                    f,
                    "regexp `{}` in file {:?} doesn't compile: {}",
                    selector.unwrap_or_default(),
                    rule_file,
                    error
                )
            }
            Reason::ResolutionError(err) => write!(f, "{}", err),
        }
    }
}
