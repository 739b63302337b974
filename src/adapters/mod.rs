//! Modules linked into the host
//!
//! Each adapter is an ordinary module: it is only bootstrapped when a module
//! file naming its entry point is deployed and listed in configuration.

pub mod memory_store;
pub mod unit_of_work;

pub use memory_store::{MemoryDataContext, MemoryStoreModule};
pub use unit_of_work::UnitOfWorkModule;

use crate::module::{BootstrapError, ModuleCatalog};

/// Catalog of every module factory compiled into this host
pub fn builtin_catalog() -> Result<ModuleCatalog, BootstrapError> {
    ModuleCatalog::new()
        .with(memory_store::ENTRY_POINT, MemoryStoreModule::create)?
        .with(unit_of_work::ENTRY_POINT, UnitOfWorkModule::create)
}
