//! # Daedalus
//!
//! **Declarative request binding and staged endpoint dispatch over HTTP.**
//!
//! An endpoint is a plain struct. Field attributes say where each value comes
//! from, and dispatch runs four stages for every request:
//!
//! ```text
//! Bind → Enrich → Execute → Respond
//! ```
//!
//! A failure in any stage skips the remaining ones and is rendered by the
//! endpoint's response format.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//!
//! #[derive(Default, Bind)]
//! struct GetPokemon {
//!     #[bind(path = "name")]
//!     name: String,
//!     #[bind(query = "shiny,default=false")]
//!     shiny: bool,
//! }
//!
//! impl Enrich for GetPokemon {}
//!
//! impl Execute for GetPokemon {
//!     type Output = String;
//!
//!     async fn execute(&self, _ctx: &RequestContext) -> Result<Reply<String>, Error> {
//!         Ok(Reply::ok(format!("{} (shiny: {})", self.name, self.shiny)))
//!     }
//! }
//!
//! impl Endpoint for GetPokemon {
//!     type Format = PlainText;
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::builder()
//!         .route::<GetPokemon>(Method::GET, "/pokemon/{name}", "getPokemon")
//!         .build()?;
//!
//!     Server::new(ServerConfig::default(), app).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! Crates deriving [`Bind`](macros::Bind) must also depend on
//! `daedalus-bind` directly; generated code refers to it by name.

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]

pub use daedalus_bind as bind;
pub use daedalus_config as config;
pub use daedalus_core as core;
pub use daedalus_macros as macros;
pub use daedalus_router as router;
pub use daedalus_server as server;
pub use daedalus_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use daedalus_bind::{BindContext, Json, PlainText, Reply};
    pub use daedalus_core::{CancellationToken, Error, RequestContext, RequestId};
    pub use daedalus_macros::Bind;
    pub use daedalus_server::{
        Application, ApplicationBuilder, Endpoint, Enrich, Execute, Server, ServerConfig,
    };
    pub use http::{Method, StatusCode};
}
