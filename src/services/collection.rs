//! Build-only service registrations
//!
//! Modules contribute bindings here during the registration phase. Nothing can
//! be resolved from a collection; it must be consumed by [`ServiceCollection::build`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::services::provider::ServiceProvider;
use crate::services::ServiceError;

/// A resolved service, type-erased. Always holds an `Arc<T>` for the registered `T`.
pub(crate) type ErasedService = Box<dyn Any + Send + Sync>;

/// Type-erased factory producing an [`ErasedService`]
pub(crate) type ErasedFactory =
    Arc<dyn Fn(&ServiceProvider) -> Result<ErasedService, ServiceError> + Send + Sync>;

/// How often a registration's factory runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// Created once per provider, on first resolution
    Singleton,
    /// Created on every resolution
    Transient,
}

/// A single registration
#[derive(Clone)]
pub(crate) struct ServiceDescriptor {
    pub(crate) type_name: &'static str,
    pub(crate) lifetime: ServiceLifetime,
    pub(crate) factory: ErasedFactory,
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("type_name", &self.type_name)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Mutable set of service registrations, keyed by service type
///
/// `T` may be a trait object (`dyn DataContext`), which is how ports are
/// bound to adapter implementations. Registering the same type twice replaces
/// the earlier registration.
#[derive(Debug, Default)]
pub struct ServiceCollection {
    descriptors: HashMap<TypeId, ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing instance as a singleton
    pub fn add_singleton<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert::<T>(ServiceLifetime::Singleton, move |_| Ok(Arc::clone(&instance)))
    }

    /// Register a singleton built lazily from the provider on first use
    pub fn add_singleton_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>, ServiceError> + Send + Sync + 'static,
    {
        self.insert::<T>(ServiceLifetime::Singleton, factory)
    }

    /// Register a service built anew on every resolution
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>, ServiceError> + Send + Sync + 'static,
    {
        self.insert::<T>(ServiceLifetime::Transient, factory)
    }

    /// Whether a registration exists for `T`
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.descriptors.contains_key(&TypeId::of::<T>())
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Finalize the registrations into a queryable provider
    pub fn build(self) -> ServiceProvider {
        debug!("Building service provider with {} registrations", self.descriptors.len());
        ServiceProvider::from_descriptors(self.descriptors)
    }

    fn insert<T>(
        &mut self,
        lifetime: ServiceLifetime,
        factory: impl Fn(&ServiceProvider) -> Result<Arc<T>, ServiceError> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let erased: ErasedFactory =
            Arc::new(move |provider: &ServiceProvider| factory(provider).map(|s| Box::new(s) as ErasedService));

        let previous = self.descriptors.insert(
            TypeId::of::<T>(),
            ServiceDescriptor {
                type_name,
                lifetime,
                factory: erased,
            },
        );
        if previous.is_some() {
            debug!("Replacing registration for {}", type_name);
        } else {
            debug!("Registered {} ({:?})", type_name, lifetime);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_registration_is_keyed_by_type() {
        let mut services = ServiceCollection::new();
        assert!(services.is_empty());

        services.add_singleton::<dyn Greeter>(Arc::new(English));
        services.add_singleton(Arc::new(42u32));

        assert_eq!(services.len(), 2);
        assert!(services.contains::<dyn Greeter>());
        assert!(services.contains::<u32>());
        assert!(!services.contains::<English>());
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let mut services = ServiceCollection::new();
        services.add_singleton(Arc::new(1u32));
        services.add_singleton(Arc::new(2u32));

        assert_eq!(services.len(), 1);
        let provider = services.build();
        assert_eq!(*provider.require::<u32>().unwrap(), 2);
    }
}
