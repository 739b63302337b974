//! HexInz Runner - module bootstrap host for the HexInz library-management application
//!
//! The application is split into independently built modules (persistence
//! adapters, application services). This crate is the host side: it locates
//! the configured modules next to the host, resolves their dependencies across
//! an isolation boundary, and runs the two-phase bootstrap protocol.
//!
//! ## Bootstrap
//!
//! ```rust,no_run
//! use hexinz_runner::{Configuration, HexInzApp, ServiceCollection};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Configuration::from_toml_file("hexinz.toml")?;
//! let mut services = ServiceCollection::new();
//!
//! let registered = HexInzApp::build(&mut services, &config)?;
//! let provider = services.build();
//! let modules = HexInzApp::init(registered, &provider, &config)?;
//! # let _ = modules;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod app;
pub mod config;
pub mod module;
pub mod ports;
pub mod services;
pub mod utils;

pub use app::HexInzApp;
pub use config::{ConfigError, Configuration};
pub use module::{BootstrapError, Module, ModuleError, ModuleManager};
pub use services::{ServiceCollection, ServiceProvider};
