//! Module file location
//!
//! A module file sits at `<host dir>/<module>.<ext>`, where every occurrence of
//! the host's program name in the host directory is replaced by the module
//! identifier. With a flat deployment (`/opt/hexinz/bin/hexinz-runner`) this is
//! simply `/opt/hexinz/bin/<module>.module`; with per-project output
//! directories (`/src/hexinz-runner/bin/`) each module resolves to its own
//! project's output (`/src/<module>/bin/<module>.module`).

use std::path::{Component, Path, PathBuf};

use crate::config::HostConfig;
use crate::module::error::BootstrapError;

/// Host-relative template used to compute module file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePathTemplate {
    host_dir: PathBuf,
    host_name: String,
    extension: String,
}

impl ModulePathTemplate {
    pub fn new(
        host_dir: impl Into<PathBuf>,
        host_name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            host_dir: host_dir.into(),
            host_name: host_name.into(),
            extension: extension.into(),
        }
    }

    /// Template derived from the running executable
    pub fn from_current_exe(extension: impl Into<String>) -> Result<Self, BootstrapError> {
        let exe = std::env::current_exe()
            .map_err(|e| BootstrapError::HostPathUnavailable(e.to_string()))?;
        let (host_dir, host_name) = Self::split_host_path(&exe)?;
        Ok(Self::new(host_dir, host_name, extension))
    }

    /// Template from `[Host]` settings, falling back to the running executable
    ///
    /// An explicit `module_root` without a `name` disables substitution.
    pub fn from_host_config(host: &HostConfig) -> Result<Self, BootstrapError> {
        let mut template = match &host.module_root {
            Some(root) => Self::new(root, "", host.module_extension.clone()),
            None => Self::from_current_exe(host.module_extension.clone())?,
        };
        if let Some(name) = &host.name {
            template.host_name = name.clone();
        }
        Ok(template)
    }

    fn split_host_path(exe: &Path) -> Result<(PathBuf, String), BootstrapError> {
        let host_dir = exe.parent().ok_or_else(|| {
            BootstrapError::HostPathUnavailable(format!("{:?} has no parent directory", exe))
        })?;
        let host_name = exe
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                BootstrapError::HostPathUnavailable(format!("{:?} has no program name", exe))
            })?;
        Ok((host_dir.to_path_buf(), host_name.to_string()))
    }

    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Expected file path for a module identifier
    pub fn module_path(&self, module_id: &str) -> PathBuf {
        let dir = if self.host_name.is_empty() {
            self.host_dir.clone()
        } else {
            self.host_dir
                .components()
                .map(|component| self.substitute(component, module_id))
                .collect()
        };
        dir.join(format!("{}.{}", module_id, self.extension))
    }

    /// Rewrite one directory component; non-UTF-8 components are kept byte for byte
    fn substitute(&self, component: Component<'_>, module_id: &str) -> PathBuf {
        match component {
            Component::Normal(name) => match name.to_str() {
                Some(name) => PathBuf::from(name.replace(&self.host_name, module_id)),
                None => PathBuf::from(name),
            },
            other => PathBuf::from(other.as_os_str()),
        }
    }
}
