//! Isolated loading boundary
//!
//! One boundary per module. It owns the module file and its private
//! dependency manifest, and decides for each dependency name whether the host
//! already has it (share) or the module brings its own (load privately).
//!
//! Resolution order, first match wins:
//! 1. exact name in the [`SharedSymbolTable`]: the host's handle is returned
//! 2. the module's private manifest, if the listed file exists: loaded into
//!    this boundary only and cached there
//! 3. otherwise unresolved
//!
//! Nothing is resolved when a boundary is created. Names are resolved when the
//! bootstrap sequence touches them.

pub mod deps;
pub mod shared;

pub use deps::DependencyManifest;
pub use shared::{Library, LibraryOrigin, SharedSymbolTable};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::module::error::BootstrapError;
use crate::module::registry::manifest::ModuleManifest;

/// Outcome of a successful dependency lookup
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Satisfied by the host's shared symbol table
    Shared(Arc<Library>),
    /// Satisfied by the module's private manifest
    Private { path: PathBuf, library: Arc<Library> },
}

impl Resolution {
    /// The resolved library handle
    pub fn library(&self) -> &Arc<Library> {
        match self {
            Resolution::Shared(library) => library,
            Resolution::Private { library, .. } => library,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Resolution::Shared(_))
    }
}

/// Per-module resolution context
#[derive(Debug)]
pub struct LoadBoundary {
    module_id: String,
    module_path: PathBuf,
    base_dir: PathBuf,
    manifest: DependencyManifest,
    shared: Arc<SharedSymbolTable>,
    private: RwLock<HashMap<String, Arc<Library>>>,
}

impl LoadBoundary {
    /// Create a boundary for a module file
    ///
    /// Reads the companion dependency manifest but resolves nothing.
    pub fn new(
        module_id: impl Into<String>,
        module_path: &Path,
        shared: Arc<SharedSymbolTable>,
    ) -> Result<Self, BootstrapError> {
        let manifest = DependencyManifest::load_for(module_path)?;
        let base_dir = module_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            module_id: module_id.into(),
            module_path: module_path.to_path_buf(),
            base_dir,
            manifest,
            shared,
            private: RwLock::new(HashMap::new()),
        })
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn dependency_manifest(&self) -> &DependencyManifest {
        &self.manifest
    }

    /// Load and parse the module file itself through this boundary
    pub fn load_module_file(&self) -> Result<ModuleManifest, BootstrapError> {
        debug!("Loading module file {:?}", self.module_path);
        ModuleManifest::from_file(&self.module_path)
    }

    /// Resolve a managed dependency by name
    pub fn resolve(&self, name: &str) -> Result<Resolution, BootstrapError> {
        debug!("Module {}: resolving dependency {}", self.module_id, name);

        if let Some(library) = self.shared.get(name) {
            debug!(
                "Module {}: {} resolved from shared symbol table (load {})",
                self.module_id,
                name,
                library.load_id()
            );
            return Ok(Resolution::Shared(library));
        }

        if let Some(library) = self.cached(name) {
            return Ok(Resolution::Private {
                path: self.private_path(&library),
                library,
            });
        }

        if let Some(path) = self.manifest_path(self.manifest.dependency_path(name)) {
            let library = Library::load_private(name, &path).map_err(|source| {
                BootstrapError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            debug!(
                "Module {}: {} resolved from {:?} (sha256 {}, load {})",
                self.module_id,
                name,
                path,
                library.digest().unwrap_or_default(),
                library.load_id()
            );
            let library = self.cache(library);
            return Ok(Resolution::Private { path, library });
        }

        warn!("Module {}: UNRESOLVED dependency {}", self.module_id, name);
        Err(BootstrapError::UnresolvedDependency {
            module: self.module_id.clone(),
            dependency: name.to_string(),
        })
    }

    /// Resolve a native library to a path
    ///
    /// Native libraries are never shared; only the private manifest is consulted.
    pub fn resolve_native(&self, name: &str) -> Option<PathBuf> {
        let path = self.manifest_path(self.manifest.native_path(name));
        match &path {
            Some(p) => debug!("Module {}: native {} resolved to {:?}", self.module_id, name, p),
            None => warn!("Module {}: UNRESOLVED native library {}", self.module_id, name),
        }
        path
    }

    /// Libraries loaded privately into this boundary so far
    pub fn private_libraries(&self) -> Vec<Arc<Library>> {
        let private = self.private.read().unwrap_or_else(|e| e.into_inner());
        private.values().cloned().collect()
    }

    fn manifest_path(&self, relative: Option<&str>) -> Option<PathBuf> {
        let path = self.base_dir.join(relative?);
        path.is_file().then_some(path)
    }

    fn cached(&self, name: &str) -> Option<Arc<Library>> {
        let private = self.private.read().unwrap_or_else(|e| e.into_inner());
        private.get(name).cloned()
    }

    fn cache(&self, library: Library) -> Arc<Library> {
        let mut private = self.private.write().unwrap_or_else(|e| e.into_inner());
        let handle = private
            .entry(library.name().to_string())
            .or_insert_with(|| Arc::new(library));
        Arc::clone(handle)
    }

    fn private_path(&self, library: &Library) -> PathBuf {
        match library.origin() {
            LibraryOrigin::Private { path } => path.clone(),
            LibraryOrigin::Shared => PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn shared_table() -> Arc<SharedSymbolTable> {
        Arc::new(SharedSymbolTable::new().with_library(Library::shared("hexinz-ports", Some("1.0.0"))))
    }

    #[test]
    fn test_shared_name_wins_over_private_manifest() {
        let dir = TempDir::new().unwrap();
        let module = write(dir.path(), "store.module", "");
        write(dir.path(), "store.deps.toml", "[dependencies]\n\"hexinz-ports\" = \"deps/ports.lib\"\n");
        write(dir.path(), "deps/ports.lib", "private copy");

        let shared = shared_table();
        let boundary = LoadBoundary::new("store", &module, Arc::clone(&shared)).unwrap();

        let resolution = boundary.resolve("hexinz-ports").unwrap();
        assert!(resolution.is_shared());
        assert!(Arc::ptr_eq(resolution.library(), &shared.get("hexinz-ports").unwrap()));
        assert!(boundary.private_libraries().is_empty());
    }

    #[test]
    fn test_private_dependency_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        let module = write(dir.path(), "store.module", "");
        write(dir.path(), "store.deps.toml", "[dependencies]\nhelpers = \"deps/helpers.lib\"\n");
        let lib_path = write(dir.path(), "deps/helpers.lib", "helpers image");

        let boundary = LoadBoundary::new("store", &module, shared_table()).unwrap();

        let first = boundary.resolve("helpers").unwrap();
        let second = boundary.resolve("helpers").unwrap();

        match &first {
            Resolution::Private { path, library } => {
                assert_eq!(path, &lib_path);
                assert_eq!(library.size(), "helpers image".len());
            }
            Resolution::Shared(_) => panic!("expected private resolution"),
        }
        assert!(Arc::ptr_eq(first.library(), second.library()));
        assert_eq!(boundary.private_libraries().len(), 1);
    }

    #[test]
    fn test_listed_but_missing_file_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let module = write(dir.path(), "store.module", "");
        write(dir.path(), "store.deps.toml", "[dependencies]\nhelpers = \"deps/helpers.lib\"\n");

        let boundary = LoadBoundary::new("store", &module, shared_table()).unwrap();

        match boundary.resolve("helpers") {
            Err(BootstrapError::UnresolvedDependency { module, dependency }) => {
                assert_eq!(module, "store");
                assert_eq!(dependency, "helpers");
            }
            other => panic!("expected unresolved dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_creation_is_lazy() {
        let dir = TempDir::new().unwrap();
        let module = write(dir.path(), "store.module", "");
        write(dir.path(), "store.deps.toml", "[dependencies]\nmissing = \"deps/missing.lib\"\n");

        // Boundary creation succeeds even though a listed dependency is absent
        let boundary = LoadBoundary::new("store", &module, shared_table()).unwrap();
        assert!(boundary.resolve("missing").is_err());
    }

    #[test]
    fn test_native_resolution_skips_shared_table() {
        let dir = TempDir::new().unwrap();
        let module = write(dir.path(), "store.module", "");
        write(dir.path(), "store.deps.toml", "[native]\nsqlite3 = \"native/libsqlite3.so\"\n");
        let native = write(dir.path(), "native/libsqlite3.so", "elf");

        let shared = Arc::new(SharedSymbolTable::new().with_library(Library::shared("zstd", None)));
        let boundary = LoadBoundary::new("store", &module, shared).unwrap();

        assert_eq!(boundary.resolve_native("sqlite3"), Some(native));
        // Present in the shared table but not in the manifest
        assert_eq!(boundary.resolve_native("zstd"), None);
    }
}
