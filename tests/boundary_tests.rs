//! Loading boundary integration tests
//!
//! Shared names resolve to the host's single handle in every module; private
//! dependencies stay inside the boundary that loaded them.

mod common;

use common::*;
use std::sync::Arc;

use hexinz_runner::module::{Library, LibraryOrigin, Resolution, SharedSymbolTable};
use hexinz_runner::services::ServiceCollection;

#[test]
fn test_shared_library_has_one_identity_across_modules() {
    let fixture = BootstrapFixture::new();
    fixture.write_module("alpha", &["hexinz-ports"]);
    fixture.write_module("bravo", &["hexinz-ports"]);
    // A private copy of a shared name is never consulted
    fixture.write_deps("bravo", &[("hexinz-ports", "deps/ports.lib")]);
    fixture.write_file("deps/ports.lib", "stale private copy");

    let shared = ports_table();
    let manager = fixture.manager(Arc::clone(&shared), fixture.recording_catalog(&["alpha", "bravo"]));
    let mut services = ServiceCollection::new();
    let registered = manager
        .register_modules(&mut services, &modules_config(&["alpha", "bravo"]))
        .unwrap();

    let host_handle = shared.get("hexinz-ports").unwrap();
    for id in ["alpha", "bravo"] {
        let unit = registered.registry().unit(id).unwrap();
        let resolution = unit.boundary().resolve("hexinz-ports").unwrap();
        assert!(resolution.is_shared());
        assert!(Arc::ptr_eq(resolution.library(), &host_handle));
        assert_eq!(resolution.library().load_id(), host_handle.load_id());
        assert!(unit.boundary().private_libraries().is_empty());
    }
}

#[test]
fn test_private_dependencies_are_isolated_per_module() {
    let fixture = BootstrapFixture::new();
    fixture.write_module("alpha", &["geo-index"]);
    fixture.write_module("bravo", &["geo-index"]);
    fixture.write_module("charlie", &[]);
    fixture.write_deps("alpha", &[("geo-index", "alpha-deps/geo-index.lib")]);
    fixture.write_deps("bravo", &[("geo-index", "bravo-deps/geo-index.lib")]);
    let alpha_lib = fixture.write_file("alpha-deps/geo-index.lib", "geo-index 1.2");
    let bravo_lib = fixture.write_file("bravo-deps/geo-index.lib", "geo-index 2.0 rewritten");

    let manager = fixture.manager(
        ports_table(),
        fixture.recording_catalog(&["alpha", "bravo", "charlie"]),
    );
    let mut services = ServiceCollection::new();
    let registered = manager
        .register_modules(&mut services, &modules_config(&["alpha", "bravo", "charlie"]))
        .unwrap();
    let registry = registered.registry();

    let alpha = registry.unit("alpha").unwrap().boundary().resolve("geo-index").unwrap();
    let bravo = registry.unit("bravo").unwrap().boundary().resolve("geo-index").unwrap();

    match (&alpha, &bravo) {
        (
            Resolution::Private { path: alpha_path, library: alpha_library },
            Resolution::Private { path: bravo_path, library: bravo_library },
        ) => {
            assert_eq!(alpha_path, &alpha_lib);
            assert_eq!(bravo_path, &bravo_lib);
            assert!(!Arc::ptr_eq(alpha_library, bravo_library));
            assert_ne!(alpha_library.load_id(), bravo_library.load_id());
            assert_ne!(alpha_library.digest(), bravo_library.digest());
            assert!(matches!(alpha_library.origin(), LibraryOrigin::Private { .. }));
        }
        other => panic!("expected two private resolutions, got {:?}", other),
    }

    // Resolved during registration, so the boundary already holds its copy
    let alpha_unit = registry.unit("alpha").unwrap();
    assert_eq!(alpha_unit.boundary().private_libraries().len(), 1);

    // A module without its own manifest cannot see another module's private copy
    let charlie = registry.unit("charlie").unwrap();
    assert!(charlie.boundary().resolve("geo-index").is_err());
}

#[test]
fn test_shared_table_membership_decides_sharing() {
    let fixture = BootstrapFixture::new();
    fixture.write_module("alpha", &["serde-shim"]);
    fixture.write_deps("alpha", &[("serde-shim", "deps/serde-shim.lib")]);
    fixture.write_file("deps/serde-shim.lib", "private image");

    // Same module, two hosts: one shares the name, one does not
    let sharing = Arc::new(SharedSymbolTable::new().with_library(Library::shared("serde-shim", Some("1.0.0"))));
    for (shared, expect_shared) in [(sharing, true), (Arc::new(SharedSymbolTable::new()), false)] {
        let manager = fixture.manager(shared, fixture.recording_catalog(&["alpha"]));
        let mut services = ServiceCollection::new();
        let registered = manager
            .register_modules(&mut services, &modules_config(&["alpha"]))
            .unwrap();

        let resolution = registered
            .registry()
            .unit("alpha")
            .unwrap()
            .boundary()
            .resolve("serde-shim")
            .unwrap();
        assert_eq!(resolution.is_shared(), expect_shared);
    }
}

#[test]
fn test_host_table_exposes_contract_libraries() {
    let table = SharedSymbolTable::host();
    assert!(table.contains("hexinz-ports"));
    assert!(table.contains("hexinz-services"));
    assert!(table.get("hexinz-ports").unwrap().is_shared());
}
