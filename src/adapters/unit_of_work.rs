//! Unit-of-work module
//!
//! Binds [`UnitOfWork`] over whatever [`crate::ports::DataContext`] another
//! module registered, and checks during initialization that it resolves.

use tracing::info;

use crate::config::Configuration;
use crate::module::traits::{Module, ModuleError};
use crate::ports::{DataContextUnitOfWork, UnitOfWork};
use crate::services::{ServiceCollection, ServiceProvider};

/// Entry-point symbol of the unit-of-work module
pub const ENTRY_POINT: &str = "unit_of_work::module";

/// Module definition for the unit of work
#[derive(Debug, Default)]
pub struct UnitOfWorkModule;

impl UnitOfWorkModule {
    /// Catalog factory
    pub fn create() -> Box<dyn Module> {
        Box::new(Self)
    }
}

impl Module for UnitOfWorkModule {
    fn name(&self) -> &str {
        "unit-of-work"
    }

    fn register_services(
        &self,
        services: &mut ServiceCollection,
        _config: &Configuration,
    ) -> Result<(), ModuleError> {
        DataContextUnitOfWork::register(services);
        Ok(())
    }

    fn initialize_services(
        &self,
        provider: &ServiceProvider,
        _config: &Configuration,
    ) -> Result<(), ModuleError> {
        provider.require::<dyn UnitOfWork>()?;
        info!("Unit of work bound to registered data context");
        Ok(())
    }
}
