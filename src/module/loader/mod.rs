//! Module loading system
//!
//! Locates module files next to the host and loads them behind isolated boundaries.

pub mod loader;
pub mod path;

pub use loader::ModuleLoader;
pub use path::ModulePathTemplate;
