//! Manifest validation framework
//!
//! Validates module manifests for structure before a unit is accepted.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::module::registry::manifest::ModuleManifest;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Manifest is valid
    Valid,
    /// Manifest is invalid with specific errors
    Invalid(Vec<String>),
}

/// Manifest validator
pub struct ManifestValidator {
    /// Maximum length of names and symbols
    max_name_len: usize,
}

impl ManifestValidator {
    /// Create a new manifest validator
    pub fn new() -> Self {
        Self { max_name_len: 128 }
    }

    /// Validate a module manifest
    pub fn validate(&self, manifest: &ModuleManifest) -> ValidationResult {
        let mut errors = Vec::new();

        if !self.is_valid_name(&manifest.name) {
            errors.push(format!(
                "Invalid module name: {} (must be alphanumeric with dots/dashes/underscores)",
                manifest.name
            ));
        }

        if manifest.version.is_empty() {
            errors.push("Module version cannot be empty".to_string());
        } else if !self.is_valid_version(&manifest.version) {
            errors.push(format!(
                "Invalid version format: {} (expected semantic versioning)",
                manifest.version
            ));
        }

        if !self.is_valid_symbol(&manifest.entry_point) {
            errors.push(format!("Invalid entry point symbol: {}", manifest.entry_point));
        }

        let mut seen = HashSet::new();
        for symbol in &manifest.exports {
            if !self.is_valid_symbol(symbol) {
                errors.push(format!("Invalid exported symbol: {}", symbol));
            }
            if !seen.insert(symbol.as_str()) {
                errors.push(format!("Symbol exported more than once: {}", symbol));
            }
        }

        for dependency in &manifest.requires {
            if !self.is_valid_name(dependency) {
                errors.push(format!("Invalid dependency name: {}", dependency));
            }
        }

        if errors.is_empty() {
            debug!("Manifest validation passed for module: {}", manifest.name);
            ValidationResult::Valid
        } else {
            warn!(
                "Manifest validation failed for module {}: {:?}",
                manifest.name, errors
            );
            ValidationResult::Invalid(errors)
        }
    }

    /// Module and dependency names: alphanumeric start, then alphanumerics, `.`, `-`, `_`
    #[inline]
    fn is_valid_name(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > self.max_name_len {
            return false;
        }

        if !name.chars().next().map_or(false, |c| c.is_alphanumeric()) {
            return false;
        }

        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Symbols additionally allow `::` path separators
    #[inline]
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        if symbol.is_empty() || symbol.len() > self.max_name_len {
            return false;
        }
        symbol
            .split("::")
            .all(|segment| self.is_valid_name(segment))
    }

    /// Validate version format (semantic versioning)
    ///
    /// Accepts: major.minor[.patch][-prerelease][+build]
    #[inline]
    fn is_valid_version(&self, version: &str) -> bool {
        if version.is_empty() {
            return false;
        }

        let base = version.split_once('+').map_or(version, |(base, _build)| base);
        let version_part = base.split_once('-').map_or(base, |(v, _prerelease)| v);

        let nums: Vec<&str> = version_part.split('.').collect();
        if nums.len() < 2 || nums.len() > 3 {
            return false;
        }

        nums.iter().all(|n| {
            !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) && n.parse::<u32>().is_ok()
        })
    }
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}
