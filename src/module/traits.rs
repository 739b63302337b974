//! Module system traits and interfaces
//!
//! Defines the capability contract every module definition implements and
//! the errors a module may report back to the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, Configuration};
use crate::ports::PersistenceError;
use crate::services::{ServiceCollection, ServiceError, ServiceProvider};

/// Module metadata describing module identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module name
    pub name: String,
    /// Module version (semantic versioning)
    pub version: String,
    /// Human-readable description
    pub description: String,
    /// Module author
    pub author: String,
    /// Well-known entry-point symbol
    pub entry_point: String,
}

/// Bootstrap phase a module call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulePhase {
    /// Contributing bindings to the not-yet-built service collection
    Registration,
    /// Setting up against the built service provider
    Initialization,
}

impl std::fmt::Display for ModulePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registration => write!(f, "registration"),
            Self::Initialization => write!(f, "initialization"),
        }
    }
}

/// Capability contract that every module definition implements
///
/// Each method runs exactly once per process, in configuration order. The
/// host builds its service provider between the two calls, so a module's
/// `initialize_services` can resolve services registered by any module.
pub trait Module: Send + Sync {
    /// Module name, used in logs and errors
    fn name(&self) -> &str;

    /// Contribute bindings to the service collection
    ///
    /// The collection is build-only at this point; nothing can be resolved from it.
    fn register_services(
        &self,
        services: &mut ServiceCollection,
        config: &Configuration,
    ) -> Result<(), ModuleError>;

    /// Perform setup against the finalized service provider
    fn initialize_services(
        &self,
        provider: &ServiceProvider,
        config: &Configuration,
    ) -> Result<(), ModuleError>;
}

/// Errors reported by module implementations
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Module configuration invalid: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Service container error: {0}")]
    Service(#[from] ServiceError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Module initialization failed: {0}")]
    InitializationError(String),

    #[error("Module operation failed: {0}")]
    OperationError(String),
}

impl From<anyhow::Error> for ModuleError {
    fn from(e: anyhow::Error) -> Self {
        ModuleError::OperationError(e.to_string())
    }
}
