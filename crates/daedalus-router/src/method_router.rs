//! Per-path method table.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to route targets for a single path.
///
/// ```rust
/// use daedalus_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new().get("getGame").delete("deleteGame");
///
/// assert_eq!(methods.target(&Method::GET), Some(&"getGame"));
/// assert_eq!(methods.target(&Method::POST), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: SmallVec<[(Method, T); 4]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `target` for `method`. An existing entry for the method is kept.
    #[must_use]
    pub fn on(mut self, method: Method, target: T) -> Self {
        self.insert(method, target);
        self
    }

    /// Registers a GET target.
    #[must_use]
    pub fn get(self, target: T) -> Self {
        self.on(Method::GET, target)
    }

    /// Registers a POST target.
    #[must_use]
    pub fn post(self, target: T) -> Self {
        self.on(Method::POST, target)
    }

    /// Registers a PUT target.
    #[must_use]
    pub fn put(self, target: T) -> Self {
        self.on(Method::PUT, target)
    }

    /// Registers a PATCH target.
    #[must_use]
    pub fn patch(self, target: T) -> Self {
        self.on(Method::PATCH, target)
    }

    /// Registers a DELETE target.
    #[must_use]
    pub fn delete(self, target: T) -> Self {
        self.on(Method::DELETE, target)
    }

    /// Returns the target registered for `method`.
    #[must_use]
    pub fn target(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, t)| t)
    }

    /// Methods with a registered target, in registration order.
    pub fn allowed(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// Returns `true` if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds `other` into this table without overwriting existing methods.
    pub fn merge(&mut self, other: MethodRouter<T>) {
        for (method, target) in other.entries {
            self.insert(method, target);
        }
    }

    fn insert(&mut self, method: Method, target: T) {
        if self.target(&method).is_none() {
            self.entries.push((method, target));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_registers_methods() {
        let methods = MethodRouter::new().get(1).post(2).put(3).patch(4).delete(5);

        assert_eq!(methods.target(&Method::GET), Some(&1));
        assert_eq!(methods.target(&Method::POST), Some(&2));
        assert_eq!(methods.target(&Method::PUT), Some(&3));
        assert_eq!(methods.target(&Method::PATCH), Some(&4));
        assert_eq!(methods.target(&Method::DELETE), Some(&5));
        assert_eq!(methods.target(&Method::HEAD), None);
    }

    #[test]
    fn test_first_registration_wins() {
        let methods = MethodRouter::new().get("first").get("second");
        assert_eq!(methods.target(&Method::GET), Some(&"first"));
    }

    #[test]
    fn test_extension_methods() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let methods = MethodRouter::new().on(purge.clone(), "purgeCache");
        assert_eq!(methods.target(&purge), Some(&"purgeCache"));
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut methods = MethodRouter::new().get("getGame");
        methods.merge(MethodRouter::new().get("other").delete("deleteGame"));

        assert_eq!(methods.target(&Method::GET), Some(&"getGame"));
        assert_eq!(methods.target(&Method::DELETE), Some(&"deleteGame"));
    }

    #[test]
    fn test_allowed_lists_registration_order() {
        let methods = MethodRouter::new().put("a").get("b");
        let allowed: Vec<_> = methods.allowed().cloned().collect();
        assert_eq!(allowed, vec![Method::PUT, Method::GET]);
    }
}
