//! Configuration file parsing and validation

pub mod verify_toml;

pub use verify_toml::{CONFIG_FILE_NAME, ColorOption, Config, OutputConfig, OutputFormat, VerifySection};
