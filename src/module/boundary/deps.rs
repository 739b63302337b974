//! Private dependency manifest
//!
//! Companion file `<module>.deps.toml` deployed next to a module file. Maps
//! dependency names to paths relative to the module file's directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::module::error::BootstrapError;

/// Extension of the companion dependency manifest
pub const DEPS_MANIFEST_EXTENSION: &str = "deps.toml";

/// Parsed dependency manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManifest {
    /// Managed dependencies (name -> relative path)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Native libraries (name -> relative path)
    #[serde(default)]
    pub native: BTreeMap<String, String>,
}

impl DependencyManifest {
    /// Path of the companion manifest for a module file
    pub fn companion_path(module_path: &Path) -> PathBuf {
        module_path.with_extension(DEPS_MANIFEST_EXTENSION)
    }

    /// Load the companion manifest for a module file
    ///
    /// A module without a companion manifest has no private dependencies.
    pub fn load_for(module_path: &Path) -> Result<Self, BootstrapError> {
        let path = Self::companion_path(module_path);
        if !path.exists() {
            debug!("No dependency manifest at {:?}, module has no private dependencies", path);
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self, BootstrapError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|e| BootstrapError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Relative path of a managed dependency
    pub fn dependency_path(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    /// Relative path of a native library
    pub fn native_path(&self, name: &str) -> Option<&str> {
        self.native.get(name).map(String::as_str)
    }
}
