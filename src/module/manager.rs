//! Module manager orchestrating the bootstrap sequence
//!
//! Drives the two-phase protocol across all modules in configuration order:
//!
//! 1. [`ModuleManager::register_modules`] loads every module, instantiates the
//!    definitions, and calls `register_services` on each
//! 2. the host builds its [`ServiceProvider`]
//! 3. [`RegisteredModules::initialize_modules`] calls `initialize_services` on each
//!
//! The phases are separate types. Initialization is only reachable from the
//! value registration returns and needs a built provider, so it cannot start
//! before every module has registered.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Configuration, HostConfig};
use crate::module::boundary::SharedSymbolTable;
use crate::module::error::BootstrapError;
use crate::module::loader::{ModuleLoader, ModulePathTemplate};
use crate::module::registry::{ModuleCatalog, ModuleRegistry};
use crate::module::traits::ModulePhase;
use crate::services::{ServiceCollection, ServiceProvider};

/// Module manager coordinates loading and the registration phase
pub struct ModuleManager {
    loader: ModuleLoader,
    catalog: ModuleCatalog,
}

impl ModuleManager {
    /// Create a new module manager
    pub fn new(
        template: ModulePathTemplate,
        shared: Arc<SharedSymbolTable>,
        catalog: ModuleCatalog,
    ) -> Self {
        Self {
            loader: ModuleLoader::new(template, shared),
            catalog,
        }
    }

    /// Create a module manager from the `[Host]` section of a configuration
    pub fn from_configuration(
        config: &Configuration,
        shared: Arc<SharedSymbolTable>,
        catalog: ModuleCatalog,
    ) -> Result<Self, BootstrapError> {
        let host: HostConfig = config.section("Host")?;
        let template = ModulePathTemplate::from_host_config(&host)?;
        debug!("Module path template: {:?}", template);
        Ok(Self::new(template, shared, catalog))
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Load the named modules and instantiate their definitions
    pub fn load_modules(&self, module_names: &[String]) -> Result<LoadedModules, BootstrapError> {
        let mut registry = ModuleRegistry::new();
        self.loader.load(module_names, &mut registry)?;

        if registry.unit_count() == 0 {
            return Err(BootstrapError::NoAssembliesToLoad);
        }

        registry.instantiate_module_definitions(&self.catalog)?;
        Ok(LoadedModules::new(registry))
    }

    /// Host build-time callback: load the configured modules and register their services
    pub fn register_modules(
        &self,
        services: &mut ServiceCollection,
        config: &Configuration,
    ) -> Result<RegisteredModules, BootstrapError> {
        let module_names = config.module_names()?;
        if module_names.is_empty() {
            return Err(BootstrapError::NoModulesSpecified);
        }

        self.load_modules(&module_names)?
            .register_services(services, config)
    }
}

/// Modules loaded and instantiated, not yet registered
#[derive(Debug)]
pub struct LoadedModules {
    registry: ModuleRegistry,
}

impl LoadedModules {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Registration phase
    ///
    /// Each module's required dependencies are resolved through its boundary
    /// immediately before its `register_services` call.
    pub fn register_services(
        self,
        services: &mut ServiceCollection,
        config: &Configuration,
    ) -> Result<RegisteredModules, BootstrapError> {
        if self.registry.definition_count() == 0 {
            return Err(BootstrapError::NoModulesAvailable);
        }

        info!("Registering services for {} modules", self.registry.definition_count());
        for definition in self.registry.definitions() {
            definition.unit().resolve_requirements()?;

            debug!("Registering services: {}", definition.module_id());
            definition
                .instance()
                .register_services(services, config)
                .map_err(|source| BootstrapError::ModuleFailed {
                    module: definition.module_id().to_string(),
                    phase: ModulePhase::Registration,
                    source,
                })?;
        }

        info!("Module registration complete ({} services)", services.len());
        Ok(RegisteredModules {
            registry: self.registry,
        })
    }
}

/// Modules that completed registration, waiting for the built provider
#[derive(Debug)]
pub struct RegisteredModules {
    registry: ModuleRegistry,
}

impl RegisteredModules {
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Host init-time callback: initialization phase
    pub fn initialize_modules(
        self,
        provider: &ServiceProvider,
        config: &Configuration,
    ) -> Result<InitializedModules, BootstrapError> {
        if self.registry.definition_count() == 0 {
            return Err(BootstrapError::NoModulesAvailable);
        }

        info!("Initializing {} modules", self.registry.definition_count());
        for definition in self.registry.definitions() {
            debug!("Initializing services: {}", definition.module_id());
            definition
                .instance()
                .initialize_services(provider, config)
                .map_err(|source| BootstrapError::ModuleFailed {
                    module: definition.module_id().to_string(),
                    phase: ModulePhase::Initialization,
                    source,
                })?;
        }

        info!("Module initialization complete");
        Ok(InitializedModules {
            registry: self.registry,
        })
    }
}

/// Fully bootstrapped module set; read-only for the rest of the process
#[derive(Debug)]
pub struct InitializedModules {
    registry: ModuleRegistry,
}

impl InitializedModules {
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> ModuleRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &std::path::Path) -> ModuleManager {
        ModuleManager::new(
            ModulePathTemplate::new(dir, "hexinz-runner", "module"),
            Arc::new(SharedSymbolTable::new()),
            ModuleCatalog::new(),
        )
    }

    #[test]
    fn test_empty_registry_cannot_register() {
        let loaded = LoadedModules::new(ModuleRegistry::new());
        let mut services = ServiceCollection::new();

        let result = loaded.register_services(&mut services, &Configuration::new());
        assert!(matches!(result, Err(BootstrapError::NoModulesAvailable)));
        assert!(services.is_empty());
    }

    #[test]
    fn test_missing_module_list() {
        let dir = TempDir::new().unwrap();
        let mut services = ServiceCollection::new();

        let result = manager(dir.path()).register_modules(&mut services, &Configuration::new());
        assert!(matches!(result, Err(BootstrapError::NoModulesSpecified)));
    }

    #[test]
    fn test_from_configuration_uses_host_section() {
        let config = Configuration::from_toml_str(
            "[Host]\nmodule_root = \"/srv/hexinz\"\nmodule_extension = \"mod\"\n",
        )
        .unwrap();
        let manager = ModuleManager::from_configuration(
            &config,
            Arc::new(SharedSymbolTable::new()),
            ModuleCatalog::new(),
        )
        .unwrap();

        assert_eq!(
            manager.loader().template().module_path("store"),
            std::path::PathBuf::from("/srv/hexinz/store.mod")
        );
    }
}
