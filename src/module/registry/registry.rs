//! Module registry
//!
//! Bootstrap-context bookkeeping of what was loaded and what was instantiated.
//! Written only during bootstrap, read-only afterwards.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::module::error::BootstrapError;
use crate::module::registry::catalog::ModuleCatalog;
use crate::module::registry::unit::ModuleUnit;
use crate::module::traits::Module;

/// A module definition instance together with the unit it was built from
pub struct ModuleDefinition {
    unit: Arc<ModuleUnit>,
    instance: Box<dyn Module>,
}

impl ModuleDefinition {
    pub fn unit(&self) -> &ModuleUnit {
        &self.unit
    }

    pub fn instance(&self) -> &dyn Module {
        self.instance.as_ref()
    }

    pub fn module_id(&self) -> &str {
        self.unit.id()
    }
}

impl std::fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("module_id", &self.unit.id())
            .field("name", &self.instance.name())
            .finish()
    }
}

/// Loaded units and instantiated definitions, in configuration order
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    units: Vec<Arc<ModuleUnit>>,
    definitions: Vec<ModuleDefinition>,
    instantiated: bool,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a loaded unit
    ///
    /// Identifiers are not de-duplicated; a repeated identifier is kept and logged.
    pub fn add(&mut self, unit: ModuleUnit) {
        if self.unit(unit.id()).is_some() {
            warn!(
                "Module {} is configured more than once; loading it again",
                unit.id()
            );
        }
        debug!("Registered module unit {} ({:?})", unit.id(), unit.source_path());
        self.units.push(Arc::new(unit));
    }

    /// Build one definition instance per loaded unit
    ///
    /// Each unit's entry point must be among its exports and linked in the
    /// catalog. Must run exactly once, after loading and before registration.
    pub fn instantiate_module_definitions(
        &mut self,
        catalog: &ModuleCatalog,
    ) -> Result<(), BootstrapError> {
        if self.instantiated {
            return Err(BootstrapError::AlreadyInstantiated);
        }

        let mut definitions = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let entry_point = &unit.manifest().entry_point;

            if !unit.manifest().exports_symbol(entry_point) {
                return Err(BootstrapError::EntryPointNotExported {
                    module: unit.id().to_string(),
                    entry_point: entry_point.clone(),
                });
            }

            let factory = catalog
                .lookup(entry_point)
                .ok_or_else(|| BootstrapError::EntryPointNotFound {
                    module: unit.id().to_string(),
                    entry_point: entry_point.clone(),
                })?;

            let instance = factory();
            debug!(
                "Instantiated module definition {} from {}",
                instance.name(),
                entry_point
            );
            definitions.push(ModuleDefinition {
                unit: Arc::clone(unit),
                instance,
            });
        }

        self.definitions = definitions;
        self.instantiated = true;
        info!("Instantiated {} module definitions", self.definitions.len());
        Ok(())
    }

    /// Loaded units in load order
    pub fn units(&self) -> impl Iterator<Item = &ModuleUnit> {
        self.units.iter().map(|u| u.as_ref())
    }

    /// First unit loaded under an identifier
    pub fn unit(&self, id: &str) -> Option<&ModuleUnit> {
        self.units().find(|u| u.id() == id)
    }

    /// Definition instances in load order
    pub fn definitions(&self) -> &[ModuleDefinition] {
        &self.definitions
    }

    /// Identifiers in load order
    pub fn module_ids(&self) -> Vec<&str> {
        self.units().map(ModuleUnit::id).collect()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_instantiated(&self) -> bool {
        self.instantiated
    }
}
