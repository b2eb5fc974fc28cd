//! Error model for Daedalus.
//!
//! Every stage of the dispatch pipeline reports failure through a single
//! [`Error`] value. An error carries:
//!
//! - an [`ErrorCategory`] that classifies it,
//! - the HTTP [`StatusCode`] written to the wire,
//! - a message intended for the caller,
//! - an optional underlying cause kept for diagnostics only.
//!
//! The category decides the [`FaultKind`]: caller faults (4xx) surface their
//! message verbatim, server faults (5xx) surface a sanitized message unless
//! one was set explicitly with [`Error::with_message`].

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message returned to callers for server faults that carry no explicit wording.
pub const SANITIZED_MESSAGE: &str = "internal server error";

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid request input (missing parameter, unparseable value, bad body).
    Validation,
    /// Missing or invalid credentials.
    Unauthorized,
    /// Resource not found.
    NotFound,
    /// Conflicting state (e.g. the resource already exists).
    Conflict,
    /// Framework or collaborator failure.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Picks the category that best describes an arbitrary status code.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            s if s.is_client_error() => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Who is responsible for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The request was wrong; the message is safe to show.
    Caller,
    /// The server or an endpoint declaration is wrong; details stay internal.
    Server,
}

/// The uniform error value produced by binding, enrichment and execution.
///
/// # Example
///
/// ```
/// use daedalus_core::{Error, FaultKind};
/// use http::StatusCode;
///
/// let err = Error::not_found("game does not exist");
/// assert_eq!(err.status(), StatusCode::NOT_FOUND);
/// assert_eq!(err.kind(), FaultKind::Caller);
/// assert_eq!(err.to_string(), "404 Not Found: game does not exist");
/// ```
#[derive(ThisError, Debug)]
#[error(
    "{} {}: {message}",
    .status.as_u16(),
    .status.canonical_reason().unwrap_or("Unknown")
)]
pub struct Error {
    category: ErrorCategory,
    status: StatusCode,
    message: String,
    #[source]
    cause: Option<anyhow::Error>,
    exposed: bool,
}

impl Error {
    fn build(category: ErrorCategory, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            category,
            status,
            message: message.into(),
            cause: None,
            exposed: true,
        }
    }

    /// Creates a new error for the given category using its default status.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::build(category, category.default_status_code(), message)
    }

    /// Creates an error with an explicit status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::build(ErrorCategory::from_status(status), status, message)
    }

    /// Creates a validation (400) error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    /// Creates an unauthorized (401) error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unauthorized, message)
    }

    /// Creates a not-found (404) error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    /// Creates a conflict (409) error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Conflict, message)
    }

    /// Creates an internal (500) error whose message is framework-authored
    /// and therefore safe to show.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }

    /// Converts any error into an [`Error`].
    ///
    /// An [`Error`] passes through unchanged. Anything else becomes a 500
    /// whose message is the error's description and whose cause is the
    /// original; that description is never shown to the caller.
    ///
    /// ```
    /// use daedalus_core::{Error, SANITIZED_MESSAGE};
    ///
    /// let err = Error::wrap(std::io::Error::other("disk on fire"));
    /// assert_eq!(err.status().as_u16(), 500);
    /// assert_eq!(err.message(), "disk on fire");
    /// assert_eq!(err.public_message(), SANITIZED_MESSAGE);
    /// ```
    pub fn wrap(err: impl Into<anyhow::Error>) -> Self {
        let err: anyhow::Error = err.into();
        match err.downcast::<Self>() {
            Ok(passthrough) => passthrough,
            Err(other) => {
                let mut wrapped = Self::internal(other.to_string());
                wrapped.exposed = false;
                wrapped.cause = Some(other);
                wrapped
            }
        }
    }

    /// Like [`Error::wrap`] but replaces the message with caller-safe wording.
    pub fn wrap_with_message(err: impl Into<anyhow::Error>, message: impl Into<String>) -> Self {
        Self::wrap(err).with_message(message)
    }

    /// Replaces the message, keeping status and cause. The new message is
    /// shown to the caller even for server faults.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self.exposed = true;
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns whether the caller or the server is at fault.
    #[must_use]
    pub fn kind(&self) -> FaultKind {
        if self.status.is_server_error() {
            FaultKind::Server
        } else {
            FaultKind::Caller
        }
    }

    /// Returns the raw message, which may contain internal detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the message to write on the wire.
    #[must_use]
    pub fn public_message(&self) -> &str {
        if self.exposed || self.kind() == FaultKind::Caller {
            &self.message
        } else {
            SANITIZED_MESSAGE
        }
    }

    /// Returns the underlying cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    /// Renders the message followed by the cause chain, for logs.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        DiagnosticChain(self).to_string()
    }
}

struct DiagnosticChain<'a>(&'a Error);

impl fmt::Display for DiagnosticChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.message)?;
        if let Some(cause) = &self.0.cause {
            for link in cause.chain() {
                let text = link.to_string();
                if text != self.0.message {
                    write!(f, ": {text}")?;
                }
            }
        }
        Ok(())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::wrap(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_status_mapping() {
        assert_eq!(
            ErrorCategory::Validation.default_status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCategory::NotFound.default_status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCategory::Internal.default_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_format() {
        let err = Error::validation("missing required query parameter: name");
        assert_eq!(
            err.to_string(),
            "400 Bad Request: missing required query parameter: name"
        );
    }

    #[test]
    fn test_fault_kind() {
        assert_eq!(Error::not_found("x").kind(), FaultKind::Caller);
        assert_eq!(Error::conflict("x").kind(), FaultKind::Caller);
        assert_eq!(Error::internal("x").kind(), FaultKind::Server);
        assert_eq!(
            Error::with_status(StatusCode::BAD_GATEWAY, "x").kind(),
            FaultKind::Server
        );
    }

    #[test]
    fn test_with_status_picks_category() {
        let err = Error::with_status(StatusCode::FORBIDDEN, "nope");
        assert_eq!(err.category(), ErrorCategory::Unauthorized);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = Error::with_status(StatusCode::UNPROCESSABLE_ENTITY, "bad");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_wrap_passes_error_through() {
        let original = Error::not_found("game does not exist");
        let wrapped = Error::wrap(original);
        assert_eq!(wrapped.status(), StatusCode::NOT_FOUND);
        assert_eq!(wrapped.message(), "game does not exist");
        assert!(wrapped.cause().is_none());
    }

    #[test]
    fn test_wrap_generic_error_is_sanitized() {
        let err = Error::wrap(std::io::Error::other("connection reset by peer"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), FaultKind::Server);
        assert_eq!(err.message(), "connection reset by peer");
        assert_eq!(err.public_message(), SANITIZED_MESSAGE);
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_wrap_with_message_keeps_status_and_cause() {
        let err = Error::wrap_with_message(
            std::io::Error::other("db password rejected"),
            "storage unavailable",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "storage unavailable");
        assert!(err.cause().is_some());
        assert!(err.diagnostic().contains("db password rejected"));
    }

    #[test]
    fn test_caller_fault_message_is_verbatim() {
        let err = Error::validation("invalid query parameter 'age': expected integer")
            .with_cause(std::io::Error::other("inner"));
        assert_eq!(
            err.public_message(),
            "invalid query parameter 'age': expected integer"
        );
    }

    #[test]
    fn test_serde_json_error_converts_to_server_fault() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), FaultKind::Server);
        assert_eq!(err.public_message(), SANITIZED_MESSAGE);
    }
}
