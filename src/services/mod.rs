//! Service container handed to modules during bootstrap
//!
//! Registration happens against a [`ServiceCollection`], which has no
//! resolution API at all. The host turns it into a [`ServiceProvider`] with
//! [`ServiceCollection::build`]; only the provider can resolve services.

pub mod collection;
pub mod provider;

pub use collection::{ServiceCollection, ServiceLifetime};
pub use provider::ServiceProvider;

use thiserror::Error;

/// Service container errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service not registered: {0}")]
    NotRegistered(&'static str),

    #[error("Service factory for {service} failed: {reason}")]
    FactoryFailed {
        service: &'static str,
        reason: String,
    },

    #[error("Circular dependency detected while resolving {0}")]
    CircularDependency(&'static str),

    #[error("Service {0} resolved to an unexpected type")]
    TypeMismatch(&'static str),
}
