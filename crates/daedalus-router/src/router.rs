//! Router entry point.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::{Resolution, RouteMatch};

/// A radix-tree router mapping `(method, path)` to a target of type `T`.
///
/// ```rust
/// use daedalus_router::{Router, MethodRouter};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert("/game", MethodRouter::new().post("createGame"));
/// router.insert("/game/{id}", MethodRouter::new().get("getGame").delete("deleteGame"));
///
/// let found = router.match_route(&Method::GET, "/game/9").unwrap();
/// assert_eq!(*found.target, "getGame");
/// assert_eq!(found.params.get("id"), Some("9"));
/// ```
///
/// # Route priority
///
/// 1. static segments (`/game/latest`)
/// 2. parameter segments (`/game/{id}`)
/// 3. wildcard segments (`/files/*path`)
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Inserts a method table for a path template.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        self.root.insert(path, methods);
        self.route_count += 1;
    }

    /// Adds a single-method route.
    pub fn route(&mut self, method: Method, path: &str, target: T) {
        self.insert(path, MethodRouter::new().on(method, target));
    }

    /// Matches a method and path, returning `None` on any mismatch.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        match self.resolve(method, path) {
            Resolution::Matched(found) => Some(found),
            _ => None,
        }
    }

    /// Matches a method and path, telling a missing path apart from a
    /// path that exists under other methods.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, T> {
        let Some((methods, params)) = self.root.match_path(path) else {
            return Resolution::NotFound;
        };
        match methods.target(method) {
            Some(target) => Resolution::Matched(RouteMatch::new(target, params)),
            None => Resolution::MethodNotAllowed(methods.allowed().cloned().collect()),
        }
    }

    /// Matches a path regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Number of `insert`/`route` calls made.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns `true` if no routes were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
