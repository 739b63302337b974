//! Module loader implementation
//!
//! Turns the configured module identifiers into loaded units, one isolated
//! boundary per module.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::module::boundary::{LoadBoundary, SharedSymbolTable};
use crate::module::error::BootstrapError;
use crate::module::loader::path::ModulePathTemplate;
use crate::module::registry::{ModuleRegistry, ModuleUnit};
use crate::module::validation::{ManifestValidator, ValidationResult};

/// Module loader for locating and loading module files
pub struct ModuleLoader {
    template: ModulePathTemplate,
    shared: Arc<SharedSymbolTable>,
    validator: ManifestValidator,
}

impl ModuleLoader {
    pub fn new(template: ModulePathTemplate, shared: Arc<SharedSymbolTable>) -> Self {
        Self {
            template,
            shared,
            validator: ManifestValidator::new(),
        }
    }

    pub fn template(&self) -> &ModulePathTemplate {
        &self.template
    }

    pub fn shared_symbols(&self) -> &Arc<SharedSymbolTable> {
        &self.shared
    }

    /// Load every module in order and add the units to the registry
    ///
    /// All or nothing: units are committed only after every identifier has
    /// loaded. The first failure aborts without attempting later modules.
    pub fn load(
        &self,
        module_names: &[String],
        registry: &mut ModuleRegistry,
    ) -> Result<(), BootstrapError> {
        if module_names.is_empty() {
            return Err(BootstrapError::NoModulesSpecified);
        }

        info!(
            "Loading {} modules from {:?}",
            module_names.len(),
            self.template.host_dir()
        );

        let mut staged = Vec::with_capacity(module_names.len());
        for (index, module_name) in module_names.iter().enumerate() {
            if module_name.trim().is_empty() {
                return Err(BootstrapError::EmptyModuleIdentifier { index });
            }
            staged.push(self.load_module(module_name)?);
        }

        for unit in staged {
            registry.add(unit);
        }

        if registry.unit_count() == 0 {
            return Err(BootstrapError::NoAssembliesToLoad);
        }
        Ok(())
    }

    /// Load a single module file behind a fresh boundary
    pub fn load_module(&self, module_name: &str) -> Result<ModuleUnit, BootstrapError> {
        let path = self.template.module_path(module_name);
        info!("Loading module: [{}]", module_name);
        debug!("Path: [{:?}]", path);

        if !path.is_file() {
            return Err(BootstrapError::ModuleFileNotFound {
                module: module_name.to_string(),
                path,
            });
        }

        let boundary = LoadBoundary::new(module_name, &path, Arc::clone(&self.shared))?;
        let manifest = boundary.load_module_file()?;

        if let ValidationResult::Invalid(errors) = self.validator.validate(&manifest) {
            return Err(BootstrapError::InvalidManifest {
                path,
                reason: errors.join("; "),
            });
        }

        if manifest.name != module_name {
            warn!(
                "Module file {:?} declares name {} but was configured as {}",
                path, manifest.name, module_name
            );
        }

        let unit = ModuleUnit::new(module_name, manifest, boundary);
        let metadata = unit.metadata();
        info!(
            "Module loaded: [{}] {} {} (load {})",
            module_name,
            metadata.name,
            metadata.version,
            unit.load_id()
        );
        Ok(unit)
    }
}
