#![forbid(unsafe_code)]

//! Rule records, rule-file resolution and selector matching

pub mod matcher;
pub mod rule;
pub mod store;
pub mod violation;

// Re-export core types
pub use matcher::{CompiledRule, RuleSet, Verdict, classify};
pub use rule::{RULE_FILE_NAME, Rule, parse_rules};
pub use store::{DiskRuleFiles, MemoryRuleFiles, Resolution, RuleFiles, RuleStore};
pub use violation::{Reason, RuleRef, Violation};
