//! Radix-tree HTTP router for Daedalus.
//!
//! Maps a request method and path onto a route target (an endpoint index,
//! a name, anything the caller chooses) and captures `{param}` and
//! `*wildcard` segments into [`Params`].
//!
//! ```rust
//! use daedalus_router::{Router, MethodRouter, Resolution};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/game/{id}", MethodRouter::new().get(0_usize).delete(1));
//!
//! let found = router.match_route(&Method::DELETE, "/game/12").unwrap();
//! assert_eq!(*found.target, 1);
//! assert_eq!(found.params.get("id"), Some("12"));
//!
//! assert!(matches!(
//!     router.resolve(&Method::POST, "/game/12"),
//!     Resolution::MethodNotAllowed(_)
//! ));
//! ```
//!
//! # Layout
//!
//! ```text
//!            (root)
//!         ┌────┴────┐
//!       "ping"    "game"
//!       [GET]     [POST]
//!                   │
//!                 "{id}"
//!            [PUT,GET,DELETE]
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod method_router;
mod node;
mod params;
mod router;

pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

/// A matched route: the registered target and the captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// Target registered for the method and path.
    pub target: &'a T,
    /// Captured path parameters.
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a route match.
    #[must_use]
    pub fn new(target: &'a T, params: Params) -> Self {
        Self { target, params }
    }
}

/// Outcome of [`Router::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    /// Path and method matched.
    Matched(RouteMatch<'a, T>),
    /// The path exists but not for this method; carries the allowed methods.
    MethodNotAllowed(Vec<http::Method>),
    /// No route template matches the path.
    NotFound,
}
