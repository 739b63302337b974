//! Module manifest parsing
//!
//! A module file is a TOML manifest naming the module, the symbols it
//! exports, its well-known entry point, and the dependency names it needs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::module::error::BootstrapError;
use crate::module::traits::ModuleMetadata;

/// Module file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name
    pub name: String,
    /// Module version (semantic versioning)
    pub version: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Module author
    pub author: Option<String>,
    /// Well-known symbol the host looks up to construct the module definition
    pub entry_point: String,
    /// Symbols this module contributes
    #[serde(default)]
    pub exports: Vec<String>,
    /// Dependency names resolved through the module's boundary before registration
    #[serde(default)]
    pub requires: Vec<String>,
}

impl ModuleManifest {
    /// Load manifest from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BootstrapError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents).map_err(|reason| BootstrapError::InvalidManifest {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse manifest contents
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let manifest: ModuleManifest = toml::from_str(contents)
            .map_err(|e| format!("Failed to parse manifest TOML: {}", e))?;

        if manifest.name.is_empty() {
            return Err("Module name cannot be empty".to_string());
        }
        if manifest.entry_point.is_empty() {
            return Err("Entry point cannot be empty".to_string());
        }

        Ok(manifest)
    }

    /// Whether the module exports a symbol
    pub fn exports_symbol(&self, symbol: &str) -> bool {
        self.exports.iter().any(|s| s == symbol)
    }

    /// Convert to ModuleMetadata
    pub fn to_metadata(&self) -> ModuleMetadata {
        ModuleMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone().unwrap_or_default(),
            author: self.author.clone().unwrap_or_default(),
            entry_point: self.entry_point.clone(),
        }
    }
}
