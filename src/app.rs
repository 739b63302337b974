//! Host entry points
//!
//! The host calls into the module system exactly twice: once before building
//! its service container and once after.

use std::sync::Arc;
use tracing::info;

use crate::adapters::builtin_catalog;
use crate::config::Configuration;
use crate::module::{
    BootstrapError, InitializedModules, ModuleManager, RegisteredModules, SharedSymbolTable,
};
use crate::services::{ServiceCollection, ServiceProvider};

/// Host facade over the [`ModuleManager`]
pub struct HexInzApp;

impl HexInzApp {
    /// Build-time callback: load the configured modules and register their services
    ///
    /// Uses the host's shared symbol table and the modules linked into this binary.
    pub fn build(
        services: &mut ServiceCollection,
        config: &Configuration,
    ) -> Result<RegisteredModules, BootstrapError> {
        let shared = Arc::new(SharedSymbolTable::host());
        info!("Host shares {} libraries: {:?}", shared.len(), shared.names());

        let manager = ModuleManager::from_configuration(config, shared, builtin_catalog()?)?;
        manager.register_modules(services, config)
    }

    /// Init-time callback: initialize every registered module against the built provider
    pub fn init(
        registered: RegisteredModules,
        provider: &ServiceProvider,
        config: &Configuration,
    ) -> Result<InitializedModules, BootstrapError> {
        registered.initialize_modules(provider, config)
    }
}
