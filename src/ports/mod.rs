//! Persistence ports
//!
//! The data-access contract persistence modules bind in the service container.
//! The application core depends only on these traits; adapters live in modules.

pub mod unit_of_work;

pub use unit_of_work::DataContextUnitOfWork;

use thiserror::Error;

/// Persistence errors surfaced through the ports
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to save changes: {0}")]
    SaveFailed(String),
}

/// Data-access contract implemented by persistence adapters
pub trait DataContext: Send + Sync {
    /// Persist pending changes, returning the number of affected entries
    fn save_changes(&self) -> Result<usize, PersistenceError>;
}

/// Transaction boundary used by application services
pub trait UnitOfWork: Send + Sync {
    /// Commit the current unit of work
    fn save_changes(&self) -> Result<usize, PersistenceError>;
}
