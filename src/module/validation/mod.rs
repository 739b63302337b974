//! Module validation framework
//!
//! Provides manifest validation for loaded module files.

pub mod manifest_validator;

pub use manifest_validator::{ManifestValidator, ValidationResult};
