//! # Daedalus Server
//!
//! Endpoint capabilities, the dispatch pipeline and the HTTP server.
//!
//! - [`Bind`], [`Enrich`], [`Execute`] and [`Endpoint`] describe what an
//!   endpoint can do.
//! - [`dispatch`] runs one endpoint through Bind → Enrich → Execute →
//!   Respond.
//! - [`Application`] maps routes to endpoints and owns shared services.
//! - [`Server`] serves an application over hyper with graceful shutdown.
//!
//! ## Example
//!
//! ```rust,ignore
//! use daedalus_server::{Application, Server, ServerConfig};
//! use http::Method;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::builder()
//!         .route::<Ping>(Method::GET, "/ping", "ping")
//!         .build()?;
//!
//!     Server::new(ServerConfig::default(), app).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod config;
pub mod dispatch;
pub mod endpoint;
mod error;
pub mod registry;
mod server;
pub mod shutdown;

pub use app::{Application, ApplicationBuilder, X_REQUEST_ID};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use dispatch::{dispatch, Dispatched, Stage};
pub use endpoint::{Bind, Endpoint, Enrich, Execute};
pub use error::ServerError;
pub use registry::{BoxedDispatch, EndpointRegistry, ErasedEndpoint};
pub use server::{HttpResponse, ResponseBody, Server};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
