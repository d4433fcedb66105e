#![forbid(unsafe_code)]

//! verify-imports: per-directory import restrictions for package trees
//!
//! Rule files named `.import-restrictions` declare which imports the packages
//! in a directory (and its subdirectories) may use. The verifier resolves the
//! nearest rule file for every loaded package and reports each import that
//! hits a forbidden prefix or misses every allowed prefix.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, LoadError, ResolveError, VerifyError};

// Re-export core domain types for convenient access
pub use engine::{Report, Verifier};
pub use rules::{Rule, RuleSet, RuleStore, Violation};
pub use types::{BasePath, Package};
