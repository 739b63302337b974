//! Module catalog
//!
//! Start-time table of module factories linked into the host, keyed by the
//! entry-point symbol a module file declares. Discovery is a direct lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::module::error::BootstrapError;
use crate::module::traits::Module;

/// No-argument constructor for a module definition
pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn Module> + Send + Sync>;

/// Entry-point symbol -> factory
#[derive(Default, Clone)]
pub struct ModuleCatalog {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a factory under an entry-point symbol
    ///
    /// A symbol can be linked once; a second registration is ambiguous and rejected.
    pub fn register<F>(&mut self, symbol: impl Into<String>, factory: F) -> Result<(), BootstrapError>
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        let symbol = symbol.into();
        if self.factories.contains_key(&symbol) {
            return Err(BootstrapError::DuplicateEntryPoint(symbol));
        }
        debug!("Linked module entry point {}", symbol);
        self.factories.insert(symbol, Arc::new(factory));
        Ok(())
    }

    /// Builder form of [`ModuleCatalog::register`]
    pub fn with<F>(mut self, symbol: impl Into<String>, factory: F) -> Result<Self, BootstrapError>
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        self.register(symbol, factory)?;
        Ok(self)
    }

    /// Look up the factory for an entry point
    pub fn lookup(&self, symbol: &str) -> Option<ModuleFactory> {
        self.factories.get(symbol).cloned()
    }

    /// Linked entry points, sorted
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("symbols", &self.symbols())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::module::traits::ModuleError;
    use crate::services::{ServiceCollection, ServiceProvider};

    struct Noop;

    impl Module for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn register_services(&self, _: &mut ServiceCollection, _: &Configuration) -> Result<(), ModuleError> {
            Ok(())
        }

        fn initialize_services(&self, _: &ServiceProvider, _: &Configuration) -> Result<(), ModuleError> {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_constructs_module() {
        let catalog = ModuleCatalog::new()
            .with("noop::module", || Box::new(Noop) as Box<dyn Module>)
            .unwrap();

        let factory = catalog.lookup("noop::module").unwrap();
        assert_eq!(factory().name(), "noop");
        assert!(catalog.lookup("other::module").is_none());
        assert_eq!(catalog.symbols(), vec!["noop::module"]);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut catalog = ModuleCatalog::new();
        catalog
            .register("noop::module", || Box::new(Noop) as Box<dyn Module>)
            .unwrap();

        let result = catalog.register("noop::module", || Box::new(Noop) as Box<dyn Module>);
        assert!(matches!(result, Err(BootstrapError::DuplicateEntryPoint(s)) if s == "noop::module"));
        assert_eq!(catalog.len(), 1);
    }
}
