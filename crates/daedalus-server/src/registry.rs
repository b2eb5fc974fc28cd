//! Endpoint registration.
//!
//! Endpoints are registered by type under a name. Registration erases the
//! type into a closure that runs the full pipeline for that type, so the
//! server can hold endpoints of different types in one map.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use daedalus_bind::BindContext;
use daedalus_core::RequestContext;

use crate::dispatch::{dispatch, Dispatched};
use crate::endpoint::Endpoint;

/// Type alias for a boxed pipeline run.
pub type BoxedDispatch = Pin<Box<dyn Future<Output = Dispatched> + Send>>;

/// A type-erased endpoint.
pub type ErasedEndpoint = Arc<dyn Fn(RequestContext, BindContext) -> BoxedDispatch + Send + Sync>;

/// Maps endpoint names to their pipelines.
///
/// ```rust
/// use daedalus_server::EndpointRegistry;
///
/// let registry = EndpointRegistry::new();
/// assert!(registry.is_empty());
/// assert!(registry.get("getGame").is_none());
/// ```
#[derive(Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<Arc<str>, ErasedEndpoint>,
}

impl EndpointRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: HashMap::new(),
        }
    }

    /// Registers endpoint type `E` under `name`.
    ///
    /// Returns `false` and leaves the registry unchanged if the name is
    /// already taken.
    pub fn register<E: Endpoint>(&mut self, name: impl Into<Arc<str>>) -> bool {
        let name = name.into();
        if self.endpoints.contains_key(&name) {
            return false;
        }

        let erased: ErasedEndpoint = Arc::new(|ctx: RequestContext, request: BindContext| -> BoxedDispatch {
            Box::pin(async move { dispatch::<E>(&ctx, &request).await })
        });
        self.endpoints.insert(name, erased);
        true
    }

    /// Looks up an endpoint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ErasedEndpoint> {
        self.endpoints.get(name)
    }

    /// Checks if an endpoint is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    /// Returns the number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if no endpoints are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns an iterator over registered names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(AsRef::as_ref)
    }
}

impl std::fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("endpoints", &self.endpoints.keys().collect::<Vec<_>>())
            .finish()
    }
}
