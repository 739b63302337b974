//! In-memory persistence module
//!
//! Registers a [`DataContext`] configured from the `[Database]` section. Stands
//! in for a database-backed adapter wherever no real store is deployed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::config::{Configuration, DatabaseConfigOptions};
use crate::module::traits::{Module, ModuleError};
use crate::ports::{DataContext, PersistenceError};
use crate::services::{ServiceCollection, ServiceProvider};

/// Entry-point symbol of the in-memory store module
pub const ENTRY_POINT: &str = "memory_store::module";

/// Data context keeping a count of pending and committed changes
#[derive(Debug)]
pub struct MemoryDataContext {
    connection_string: String,
    pending: AtomicUsize,
    committed: AtomicUsize,
}

impl MemoryDataContext {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            pending: AtomicUsize::new(0),
            committed: AtomicUsize::new(0),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Record a tracked change to be flushed by the next save
    pub fn track_change(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    /// Total changes saved so far
    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }
}

impl DataContext for MemoryDataContext {
    fn save_changes(&self) -> Result<usize, PersistenceError> {
        let flushed = self.pending.swap(0, Ordering::SeqCst);
        self.committed.fetch_add(flushed, Ordering::SeqCst);
        Ok(flushed)
    }
}

/// Module definition for the in-memory store
#[derive(Debug, Default)]
pub struct MemoryStoreModule;

impl MemoryStoreModule {
    /// Catalog factory
    pub fn create() -> Box<dyn Module> {
        Box::new(Self)
    }
}

impl Module for MemoryStoreModule {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn register_services(
        &self,
        services: &mut ServiceCollection,
        config: &Configuration,
    ) -> Result<(), ModuleError> {
        let options = DatabaseConfigOptions::from_configuration(config)?;
        options.validate()?;

        let context = Arc::new(MemoryDataContext::new(options.connection_string));
        services.add_singleton(Arc::clone(&context));
        services.add_singleton::<dyn DataContext>(context);
        Ok(())
    }

    fn initialize_services(
        &self,
        provider: &ServiceProvider,
        _config: &Configuration,
    ) -> Result<(), ModuleError> {
        let context = provider.require::<MemoryDataContext>()?;
        info!("Initializing in-memory data store ({})", context.connection_string());
        Ok(())
    }
}
