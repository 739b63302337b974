//! Bootstrap errors
//!
//! Every variant is fatal to process startup. Nothing in the bootstrap
//! sequence recovers locally; the host reports the error and exits.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::module::traits::{ModuleError, ModulePhase};

/// Module bootstrap errors
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("No modules are specified in configuration")]
    NoModulesSpecified,

    #[error("Module identifier at position {index} is empty")]
    EmptyModuleIdentifier { index: usize },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Could not determine host location: {0}")]
    HostPathUnavailable(String),

    #[error("Module file not found at {path:?} for module {module}. Ensure the module is deployed next to the host")]
    ModuleFileNotFound { module: String, path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module manifest {path:?}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Unresolved dependency {dependency} for module {module}")]
    UnresolvedDependency { module: String, dependency: String },

    #[error("Module {module} does not export its entry point {entry_point}")]
    EntryPointNotExported { module: String, entry_point: String },

    #[error("No module factory is linked for entry point {entry_point} (module {module})")]
    EntryPointNotFound { module: String, entry_point: String },

    #[error("Entry point {0} is registered more than once")]
    DuplicateEntryPoint(String),

    #[error("No assemblies to load")]
    NoAssembliesToLoad,

    #[error("Module definitions have already been instantiated")]
    AlreadyInstantiated,

    #[error("No modules are available; bootstrap did not load any module")]
    NoModulesAvailable,

    #[error("Module {module} failed during {phase}: {source}")]
    ModuleFailed {
        module: String,
        phase: ModulePhase,
        #[source]
        source: ModuleError,
    },
}
