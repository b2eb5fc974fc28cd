//! # Daedalus Core
//!
//! Foundational types shared by every Daedalus crate:
//!
//! - [`Error`] - the uniform error value with status, message, cause and fault kind
//! - [`RequestContext`] - request id, endpoint name, cancellation and services
//! - [`CancellationToken`] - cooperative cancellation for the Execute stage
//! - [`Services`] - type-keyed registry of shared collaborators

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod context;
mod error;
mod services;

pub use cancel::{CancellationToken, DropGuard};
pub use context::{RequestContext, RequestId};
pub use error::{Error, ErrorCategory, FaultKind, Result, SANITIZED_MESSAGE};
pub use services::{MissingService, Services};
