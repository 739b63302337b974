//! Unit of work backed by whichever [`DataContext`] a module registered

use std::sync::Arc;
use tracing::debug;

use crate::ports::{DataContext, PersistenceError, UnitOfWork};
use crate::services::{ServiceCollection, ServiceProvider};

/// Unit of work delegating to a [`DataContext`]
pub struct DataContextUnitOfWork {
    data_context: Arc<dyn DataContext>,
}

impl DataContextUnitOfWork {
    /// Wrap a data context
    pub fn new(data_context: Arc<dyn DataContext>) -> Self {
        Self { data_context }
    }

    /// Bind `dyn UnitOfWork` to a transient resolving the registered `dyn DataContext`
    ///
    /// Resolution fails until some module has registered a data context.
    pub fn register(services: &mut ServiceCollection) {
        services.add_transient::<dyn UnitOfWork, _>(|provider: &ServiceProvider| {
            let data_context = provider.require::<dyn DataContext>()?;
            Ok(Arc::new(DataContextUnitOfWork::new(data_context)) as Arc<dyn UnitOfWork>)
        });
    }
}

impl UnitOfWork for DataContextUnitOfWork {
    fn save_changes(&self) -> Result<usize, PersistenceError> {
        let saved = self.data_context.save_changes()?;
        debug!("Unit of work committed {} changes", saved);
        Ok(saved)
    }
}
