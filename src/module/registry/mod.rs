//! Module registry and discovery
//!
//! Handles module manifests, loaded units, the entry-point catalog, and the
//! registry of instantiated module definitions.

pub mod catalog;
pub mod manifest;
pub mod registry;
pub mod unit;

pub use catalog::{ModuleCatalog, ModuleFactory};
pub use manifest::ModuleManifest;
pub use registry::{ModuleDefinition, ModuleRegistry};
pub use unit::ModuleUnit;
