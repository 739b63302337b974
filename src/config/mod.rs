//! Configuration management for the HexInz host
//!
//! [`Configuration`] is the read-only settings tree handed to every module in
//! both bootstrap phases. Typed sections ([`HostConfig`], [`LoggingConfig`],
//! [`DatabaseConfigOptions`]) are deserialized out of it on demand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Key holding the ordered list of module identifiers
pub const MODULES_CONFIGURATION_KEY: &str = "Modules";

/// Default prefix for environment overrides (`HEXINZ__Database__ConnectionString`)
pub const ENV_OVERRIDE_PREFIX: &str = "HEXINZ__";

/// Separator between path segments in environment override names
const ENV_PATH_SEPARATOR: &str = "__";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value at {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Hierarchical, read-only application settings
///
/// Keys are addressed with dotted paths (`Database.ConnectionString`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    root: toml::Table,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let root: toml::Table = toml::from_str(contents)?;
        Ok(Self { root })
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_overrides(prefix, std::env::vars())
    }

    /// Apply `PREFIX` + `Section__Key=value` overrides from an iterator of variables
    ///
    /// When the value being overridden is an array, or the key is
    /// [`MODULES_CONFIGURATION_KEY`], the override is split on commas.
    pub fn with_overrides<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(prefix) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            let path = key.replace(ENV_PATH_SEPARATOR, ".");
            let is_list = path == MODULES_CONFIGURATION_KEY
                || matches!(self.value(&path), Some(toml::Value::Array(_)));
            let new_value = if is_list {
                toml::Value::Array(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| toml::Value::String(s.to_string()))
                        .collect(),
                )
            } else {
                toml::Value::String(value)
            };
            debug!("Configuration override: {}", path);
            self.set(&path, new_value);
        }
        self
    }

    /// Set a value at a dotted path, creating intermediate tables
    pub fn set(&mut self, path: &str, value: toml::Value) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut table = &mut self.root;
        for segment in segments {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            if !entry.is_table() {
                *entry = toml::Value::Table(toml::Table::new());
            }
            table = match entry {
                toml::Value::Table(t) => t,
                _ => return,
            };
        }
        table.insert(last.to_string(), value);
    }

    /// Look up a raw value by dotted path
    pub fn value(&self, path: &str) -> Option<&toml::Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a string value by dotted path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.value(path).and_then(|v| v.as_str())
    }

    /// Deserialize the value at `path`, if present
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ConfigError> {
        match self.value(path) {
            None => Ok(None),
            Some(value) => value
                .clone()
                .try_into()
                .map(Some)
                .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
                    key: path.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Deserialize a typed section, falling back to its default when absent
    pub fn section<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, ConfigError> {
        Ok(self.get(name)?.unwrap_or_default())
    }

    /// The ordered module identifiers under [`MODULES_CONFIGURATION_KEY`]
    ///
    /// An absent key yields an empty list; emptiness is judged by the caller.
    pub fn module_names(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .get::<Vec<String>>(MODULES_CONFIGURATION_KEY)?
            .unwrap_or_default())
    }

    /// Render the effective configuration as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

fn default_module_extension() -> String {
    "module".to_string()
}

/// Host layout settings (`[Host]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Extension of module files
    #[serde(default = "default_module_extension")]
    pub module_extension: String,

    /// Directory standing in for the host's install directory
    #[serde(default)]
    pub module_root: Option<String>,

    /// Host program name substituted out of module paths
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            module_extension: default_module_extension(),
            module_root: None,
            name: None,
        }
    }
}

/// Logging settings (`[Logging]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "hexinz_runner::module=debug")
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

/// Database settings consumed by persistence modules (`[Database]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfigOptions {
    #[serde(rename = "ConnectionString", default)]
    pub connection_string: String,
}

impl DatabaseConfigOptions {
    /// Section name
    pub const SECTION_NAME: &'static str = "Database";

    /// Read the section from a configuration
    pub fn from_configuration(config: &Configuration) -> Result<Self, ConfigError> {
        config.section(Self::SECTION_NAME)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_string.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: format!("{}.ConnectionString", Self::SECTION_NAME),
                reason: "connection string cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
