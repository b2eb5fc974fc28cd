//! Collaborator lookup for endpoints.
//!
//! Endpoint instances are created fresh for every request, so anything that
//! outlives a request (a store, a client pool) is registered once in
//! [`Services`] at startup and resolved by type from the
//! [`RequestContext`](crate::RequestContext) during Execute.
//!
//! ```
//! use daedalus_core::Services;
//! use std::sync::Arc;
//!
//! struct Store;
//!
//! let mut services = Services::new();
//! services.register(Arc::new(Store));
//!
//! let store: Option<Arc<Store>> = services.get();
//! assert!(store.is_some());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error as ThisError;

use crate::Error;

/// A service type was requested but never registered.
#[derive(Debug, Clone, ThisError)]
#[error("service `{type_name}` is not registered")]
pub struct MissingService {
    /// Fully qualified name of the missing type.
    pub type_name: &'static str,
}

/// Type-keyed registry of shared collaborators.
#[derive(Default)]
pub struct Services {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Services {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any previous instance of the same type.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.entries.insert(TypeId::of::<T>(), service);
    }

    /// Looks up a service by type.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Looks up a service, failing with a server fault when it is missing.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, Error> {
        self.get().ok_or_else(|| {
            Error::internal("endpoint dependency unavailable").with_cause(MissingService {
                type_name: std::any::type_name::<T>(),
            })
        })
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("count", &self.entries.len())
            .finish()
    }
}
