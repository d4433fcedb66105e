//! Package loading and verification

pub mod adapter;
pub mod loader;
pub mod verifier;

pub use adapter::{load_packages, validate_patterns};
pub use loader::{GoListLoader, PackageLoader, PackagePattern, PackagesFileLoader, StaticLoader};
pub use verifier::{PackageReport, Report, Verifier};
