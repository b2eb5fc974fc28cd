//! Typed configuration for Daedalus services.
//!
//! A [`DaedalusConfig`] has two sections, `[server]` and `[logging]`. The
//! [`ConfigLoader`] layers defaults, an optional TOML or JSON file and
//! `DAEDALUS__SECTION__KEY` environment variables, then validates the result.
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 1048576
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! Unknown fields are rejected so typos surface at startup.

#![doc(html_root_url = "https://docs.rs/daedalus-config/0.1.0")]

mod config;
mod error;
mod loader;

pub use config::{DaedalusConfig, LoggingSection, ServerSection};
pub use error::ConfigError;
pub use loader::{ConfigLoader, FileFormat, DEFAULT_ENV_PREFIX};
