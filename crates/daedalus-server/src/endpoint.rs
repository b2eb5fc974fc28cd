//! Endpoint capabilities.
//!
//! An endpoint is a plain struct. A fresh instance is created with
//! [`Default`] for every request and then moved through the pipeline:
//!
//! | Stage    | Trait       | Provided by                         |
//! |----------|-------------|-------------------------------------|
//! | Bind     | [`Bind`]    | `#[derive(Bind)]`                   |
//! | Enrich   | [`Enrich`]  | `impl Enrich for X {}` or a custom body |
//! | Execute  | [`Execute`] | the endpoint author                 |
//! | Respond  | [`Endpoint::Format`] | [`Json`](daedalus_bind::Json) or [`PlainText`](daedalus_bind::PlainText) |
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Default, Bind)]
//! struct Ping;
//!
//! impl Enrich for Ping {}
//!
//! impl Execute for Ping {
//!     type Output = &'static str;
//!
//!     async fn execute(&self, _ctx: &RequestContext) -> Result<Reply<&'static str>, Error> {
//!         Ok(Reply::ok("pong"))
//!     }
//! }
//!
//! impl Endpoint for Ping {
//!     type Format = PlainText;
//! }
//! ```

use std::future::Future;

use daedalus_bind::{BindContext, Bindable, Encode, Reply};
use daedalus_core::{Error, RequestContext};

/// Populates the endpoint from the request.
///
/// Implemented for every [`Bindable`] type; derive `Bind` rather than
/// implementing this directly.
pub trait Bind {
    /// Reads annotated fields from `request`.
    fn bind(&mut self, request: &BindContext) -> Result<(), Error>;
}

impl<T: Bindable> Bind for T {
    fn bind(&mut self, request: &BindContext) -> Result<(), Error> {
        daedalus_bind::bind(request, self).map_err(Error::from)
    }
}

/// Derives further state from the bound fields and the raw request.
///
/// The default does nothing.
pub trait Enrich {
    /// Runs after a successful Bind.
    fn enrich(&mut self, request: &BindContext) -> Result<(), Error> {
        let _ = request;
        Ok(())
    }
}

/// The endpoint's business logic.
pub trait Execute {
    /// Value carried by a successful [`Reply`].
    type Output: Send;

    /// Runs after a successful Enrich.
    fn execute(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<Reply<Self::Output>, Error>> + Send;
}

/// A complete endpoint: all capabilities plus the response serializer.
pub trait Endpoint: Default + Bind + Enrich + Execute + Send + Sync + 'static {
    /// Serializer used by the Respond stage.
    type Format: Encode<Self::Output>;
}
