//! Output formatters (human and JSONL)

pub mod human;
pub mod jsonl;

pub use human::{DEFAULT_MAX_DISPLAYED, HumanFormatter};
pub use jsonl::JsonlFormatter;
