//! Shared fixtures for bootstrap integration tests
//!
//! A fixture owns a temporary host directory. Module files and dependency
//! manifests are written into it, and recording modules append to a shared
//! event log so tests can assert on call order across modules.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use hexinz_runner::config::Configuration;
use hexinz_runner::module::{
    Library, Module, ModuleCatalog, ModuleError, ModuleManager, ModulePathTemplate,
    SharedSymbolTable,
};
use hexinz_runner::services::{ServiceCollection, ServiceProvider};

/// Program name the fixture host pretends to run as
pub const HOST_NAME: &str = "hexinz-runner";

/// Ordered record of module calls
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Test fixture with an isolated host directory
pub struct BootstrapFixture {
    pub temp_dir: TempDir,
    pub host_dir: PathBuf,
    pub log: EventLog,
}

impl BootstrapFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let host_dir = temp_dir.path().join("bin");
        std::fs::create_dir_all(&host_dir).unwrap();
        Self {
            temp_dir,
            host_dir,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Write `<id>.module` exporting `<id>::module` and requiring `requires`
    pub fn write_module(&self, id: &str, requires: &[&str]) -> PathBuf {
        let requires = requires
            .iter()
            .map(|r| format!("\"{}\"", r))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_file(
            &format!("{}.module", id),
            &format!(
                "name = \"{id}\"\nversion = \"1.0.0\"\nentry_point = \"{id}::module\"\nexports = [\"{id}::module\"]\nrequires = [{requires}]\n"
            ),
        )
    }

    /// Write `<id>.deps.toml` listing private dependencies
    pub fn write_deps(&self, id: &str, dependencies: &[(&str, &str)]) -> PathBuf {
        let mut contents = String::from("[dependencies]\n");
        for (name, path) in dependencies {
            contents.push_str(&format!("\"{}\" = \"{}\"\n", name, path));
        }
        self.write_file(&format!("{}.deps.toml", id), &contents)
    }

    /// Write a file relative to the host directory
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.host_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn template(&self) -> ModulePathTemplate {
        ModulePathTemplate::new(&self.host_dir, HOST_NAME, "module")
    }

    /// Catalog linking a recording module for each identifier
    pub fn recording_catalog(&self, ids: &[&str]) -> ModuleCatalog {
        let mut catalog = ModuleCatalog::new();
        for id in ids {
            let name = id.to_string();
            let log = Arc::clone(&self.log);
            catalog
                .register(format!("{}::module", id), move || {
                    Box::new(RecordingModule::new(&name, Arc::clone(&log))) as Box<dyn Module>
                })
                .unwrap();
        }
        catalog
    }

    pub fn manager(&self, shared: Arc<SharedSymbolTable>, catalog: ModuleCatalog) -> ModuleManager {
        ModuleManager::new(self.template(), shared, catalog)
    }
}

/// Shared table holding the ports contract library
pub fn ports_table() -> Arc<SharedSymbolTable> {
    Arc::new(SharedSymbolTable::new().with_library(Library::shared("hexinz-ports", Some("1.0.0"))))
}

/// Configuration listing `ids` under `Modules`
pub fn modules_config(ids: &[&str]) -> Configuration {
    let list = ids
        .iter()
        .map(|id| format!("\"{}\"", id))
        .collect::<Vec<_>>()
        .join(", ");
    Configuration::from_toml_str(&format!(
        "Modules = [{}]\n\n[Database]\nConnectionString = \"memory://tests\"\n",
        list
    ))
    .unwrap()
}

/// Module that records every call it receives
pub struct RecordingModule {
    name: String,
    log: EventLog,
    fail_init: bool,
}

impl RecordingModule {
    pub fn new(name: &str, log: EventLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail_init: false,
        }
    }

    pub fn failing_init(name: &str, log: EventLog) -> Self {
        Self {
            fail_init: true,
            ..Self::new(name, log)
        }
    }

    fn record(&self, event: &str) {
        self.log.lock().unwrap().push(format!("{}:{}", event, self.name));
    }
}

impl Module for RecordingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_services(
        &self,
        _services: &mut ServiceCollection,
        _config: &Configuration,
    ) -> Result<(), ModuleError> {
        self.record("register");
        Ok(())
    }

    fn initialize_services(
        &self,
        _provider: &ServiceProvider,
        _config: &Configuration,
    ) -> Result<(), ModuleError> {
        self.record("init-start");
        if self.fail_init {
            return Err(ModuleError::InitializationError(format!(
                "{} refused to start",
                self.name
            )));
        }
        self.record("init-end");
        Ok(())
    }
}

