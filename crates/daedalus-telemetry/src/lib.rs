//! Structured logging for Daedalus services.
//!
//! Daedalus logs through `tracing`. This crate installs the subscriber:
//! an `EnvFilter` (the `RUST_LOG` environment variable wins over the
//! configured level) feeding a JSON or human-readable `fmt` layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     format: LogFormat::Pretty,
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//!
//! tracing::info!(endpoint = "getGame", "ready");
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
