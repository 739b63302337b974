//! Module bootstrap system for the HexInz host
//!
//! Loads independently built modules at startup and wires them into the
//! host's service container.
//!
//! ## Architecture
//!
//! - **Isolated boundaries**: each module resolves dependencies through its own
//!   [`boundary::LoadBoundary`], sharing what the host already has and loading
//!   the rest privately
//! - **Explicit discovery**: a module file names a well-known entry point that
//!   is looked up in the [`ModuleCatalog`] of factories linked into the host
//! - **Bootstrap context**: the [`ModuleRegistry`] is a value owned by the
//!   bootstrap sequence, not process-global state
//! - **Two phases**: registration against a build-only [`crate::services::ServiceCollection`],
//!   then initialization against the built [`crate::services::ServiceProvider`]
//! - **All or nothing**: every failure aborts startup

pub mod boundary;
pub mod error;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod traits;
pub mod validation;

pub use boundary::{Library, LibraryOrigin, LoadBoundary, Resolution, SharedSymbolTable};
pub use error::BootstrapError;
pub use loader::{ModuleLoader, ModulePathTemplate};
pub use manager::{InitializedModules, LoadedModules, ModuleManager, RegisteredModules};
pub use registry::{ModuleCatalog, ModuleDefinition, ModuleManifest, ModuleRegistry, ModuleUnit};
pub use traits::{Module, ModuleError, ModuleMetadata, ModulePhase};
