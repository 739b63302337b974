//! Shared symbol table
//!
//! Libraries the host already has loaded before any module loads. Modules
//! asking for one of these names get the host's handle, never a copy.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Where a loaded library came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryOrigin {
    /// Owned by the host and shared with every module
    Shared,
    /// Loaded from a module's private manifest into that module's boundary
    Private { path: PathBuf },
}

/// A loaded dependency image
///
/// Identity is the `Arc` handle: two lookups that must observe the same
/// library compare with [`Arc::ptr_eq`]. `load_id` is unique per load.
#[derive(Debug)]
pub struct Library {
    name: String,
    version: Option<String>,
    origin: LibraryOrigin,
    digest: Option<String>,
    size: usize,
    load_id: Uuid,
}

impl Library {
    /// A library the host carries in-process
    pub fn shared(name: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: version.map(str::to_string),
            origin: LibraryOrigin::Shared,
            digest: None,
            size: 0,
            load_id: Uuid::new_v4(),
        }
    }

    /// Load a private library image from disk
    pub fn load_private(name: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let image = std::fs::read(path)?;
        let digest = hex::encode(Sha256::digest(&image));
        Ok(Self {
            name: name.into(),
            version: None,
            origin: LibraryOrigin::Private {
                path: path.to_path_buf(),
            },
            digest: Some(digest),
            size: image.len(),
            load_id: Uuid::new_v4(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn origin(&self) -> &LibraryOrigin {
        &self.origin
    }

    /// SHA-256 of the image, hex encoded (private libraries only)
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Image size in bytes (private libraries only)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn load_id(&self) -> Uuid {
        self.load_id
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.origin, LibraryOrigin::Shared)
    }
}

/// Libraries already loaded by the host, keyed by exact name
///
/// Built once before loading starts and read-only afterwards.
#[derive(Debug, Default)]
pub struct SharedSymbolTable {
    libraries: HashMap<String, Arc<Library>>,
}

impl SharedSymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the libraries compiled into this host
    pub fn host() -> Self {
        let version = Some(env!("CARGO_PKG_VERSION"));
        Self::new()
            .with_library(Library::shared(env!("CARGO_PKG_NAME"), version))
            .with_library(Library::shared("hexinz-ports", version))
            .with_library(Library::shared("hexinz-services", version))
    }

    /// Add a library, returning the table
    pub fn with_library(mut self, library: Library) -> Self {
        self.insert(library);
        self
    }

    /// Add a library, returning its shared handle
    pub fn insert(&mut self, library: Library) -> Arc<Library> {
        let handle = Arc::new(library);
        self.libraries
            .insert(handle.name().to_string(), Arc::clone(&handle));
        handle
    }

    /// Exact-name lookup
    pub fn get(&self, name: &str) -> Option<Arc<Library>> {
        self.libraries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.contains_key(name)
    }

    /// Names of all shared libraries, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.libraries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_same_handle() {
        let mut table = SharedSymbolTable::new();
        let inserted = table.insert(Library::shared("hexinz-ports", Some("1.0.0")));

        let first = table.get("hexinz-ports").unwrap();
        let second = table.get("hexinz-ports").unwrap();

        assert!(Arc::ptr_eq(&inserted, &first));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.is_shared());
        assert_eq!(first.version(), Some("1.0.0"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = SharedSymbolTable::new().with_library(Library::shared("hexinz-ports", None));

        assert!(table.get("HexInz-Ports").is_none());
        assert!(table.get("hexinz").is_none());
        assert!(table.contains("hexinz-ports"));
    }

    #[test]
    fn test_host_table() {
        let table = SharedSymbolTable::host();

        assert_eq!(table.len(), 3);
        assert!(table.contains(env!("CARGO_PKG_NAME")));
        assert_eq!(
            table.names(),
            vec!["hexinz-ports", "hexinz-runner", "hexinz-services"]
        );
    }

    #[test]
    fn test_private_library_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("helper.lib");
        std::fs::write(&path, b"abc").unwrap();

        let library = Library::load_private("helper", &path).unwrap();

        assert!(!library.is_shared());
        assert_eq!(library.size(), 3);
        assert_eq!(
            library.digest(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(library.origin(), &LibraryOrigin::Private { path });
    }
}
