//! Loaded module unit

use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::module::boundary::{LoadBoundary, Resolution};
use crate::module::error::BootstrapError;
use crate::module::registry::manifest::ModuleManifest;
use crate::module::traits::ModuleMetadata;

/// The loaded image of one module, owned together with its boundary
#[derive(Debug)]
pub struct ModuleUnit {
    id: String,
    manifest: ModuleManifest,
    boundary: LoadBoundary,
    load_id: Uuid,
}

impl ModuleUnit {
    pub fn new(id: impl Into<String>, manifest: ModuleManifest, boundary: LoadBoundary) -> Self {
        Self {
            id: id.into(),
            manifest,
            boundary,
            load_id: Uuid::new_v4(),
        }
    }

    /// Identifier from configuration
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_path(&self) -> &Path {
        self.boundary.module_path()
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    /// Identity and authorship declared by the module file
    pub fn metadata(&self) -> ModuleMetadata {
        self.manifest.to_metadata()
    }

    /// Symbols the unit contributes
    pub fn exports(&self) -> &[String] {
        &self.manifest.exports
    }

    pub fn boundary(&self) -> &LoadBoundary {
        &self.boundary
    }

    /// Unique per load; a module configured twice gets two ids
    pub fn load_id(&self) -> Uuid {
        self.load_id
    }

    /// Resolve every dependency the manifest requires, stopping at the first failure
    pub fn resolve_requirements(&self) -> Result<Vec<Resolution>, BootstrapError> {
        self.manifest
            .requires
            .iter()
            .map(|name| self.boundary.resolve(name))
            .collect::<Result<Vec<_>, _>>()
            .inspect(|resolved| {
                debug!("Module {}: {} requirements resolved", self.id, resolved.len());
            })
    }
}
