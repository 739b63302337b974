//! Finalized, queryable service container

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::ThreadId;
use tracing::warn;

use crate::services::collection::{ErasedService, ServiceDescriptor, ServiceLifetime};
use crate::services::ServiceError;

struct ProviderEntry {
    descriptor: ServiceDescriptor,
    instance: OnceLock<ErasedService>,
}

/// Immutable container produced by [`crate::services::ServiceCollection::build`]
///
/// Singletons are created on first resolution and cached for the provider's
/// lifetime. Factories receive the provider, so a service may depend on
/// services registered by other modules.
pub struct ServiceProvider {
    entries: HashMap<TypeId, ProviderEntry>,
    /// Factories currently running, per resolving thread
    resolving: Mutex<HashSet<(ThreadId, TypeId)>>,
}

/// Marks a type as under construction until dropped
struct ResolvingGuard<'a> {
    resolving: &'a Mutex<HashSet<(ThreadId, TypeId)>>,
    key: (ThreadId, TypeId),
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        let mut resolving = self.resolving.lock().unwrap_or_else(|e| e.into_inner());
        resolving.remove(&self.key);
    }
}

impl ServiceProvider {
    pub(crate) fn from_descriptors(descriptors: HashMap<TypeId, ServiceDescriptor>) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|(id, descriptor)| {
                (
                    id,
                    ProviderEntry {
                        descriptor,
                        instance: OnceLock::new(),
                    },
                )
            })
            .collect();
        Self {
            entries,
            resolving: Mutex::new(HashSet::new()),
        }
    }

    /// Resolve `T`, failing if it is not registered or its factory fails
    pub fn require<T>(&self) -> Result<Arc<T>, ServiceError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let entry = self
            .entries
            .get(&TypeId::of::<T>())
            .ok_or(ServiceError::NotRegistered(type_name))?;

        match entry.descriptor.lifetime {
            ServiceLifetime::Singleton => {
                if entry.instance.get().is_none() {
                    let created = self.create::<T>(entry)?;
                    // A concurrent first resolution may have won; either value is valid.
                    let _ = entry.instance.set(created);
                }
                entry
                    .instance
                    .get()
                    .and_then(|erased| erased.downcast_ref::<Arc<T>>())
                    .cloned()
                    .ok_or(ServiceError::TypeMismatch(type_name))
            }
            ServiceLifetime::Transient => {
                let created = self.create::<T>(entry)?;
                created
                    .downcast::<Arc<T>>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ServiceError::TypeMismatch(type_name))
            }
        }
    }

    /// Run the factory for `T`, failing if `T` is already being built on this thread
    fn create<T>(&self, entry: &ProviderEntry) -> Result<ErasedService, ServiceError>
    where
        T: ?Sized + 'static,
    {
        let key = (std::thread::current().id(), TypeId::of::<T>());
        let inserted = {
            let mut resolving = self.resolving.lock().unwrap_or_else(|e| e.into_inner());
            resolving.insert(key)
        };
        if !inserted {
            warn!("Circular dependency while resolving {}", entry.descriptor.type_name);
            return Err(ServiceError::CircularDependency(entry.descriptor.type_name));
        }

        let _guard = ResolvingGuard {
            resolving: &self.resolving,
            key,
        };
        (entry.descriptor.factory)(self)
    }

    /// Resolve `T` if it is registered
    ///
    /// Factory failures are logged and reported as `None`.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.require::<T>() {
            Ok(service) => Some(service),
            Err(ServiceError::NotRegistered(_)) => None,
            Err(e) => {
                warn!("Failed to resolve {}: {}", std::any::type_name::<T>(), e);
                None
            }
        }
    }

    /// Whether a registration exists for `T`
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the provider has no registrations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.values().map(|e| e.descriptor.type_name))
            .finish()
    }
}
