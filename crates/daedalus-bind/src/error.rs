//! Binding error types.
//!
//! A [`BindError`] records which request channel failed, which key was being
//! read and why. Caller faults map to 400; defects in an endpoint's binding
//! declaration map to 500.

use std::fmt;

use daedalus_core::{Error, FaultKind};
use http::StatusCode;

/// Request channel a bound value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindSource {
    /// A request header.
    Header,
    /// A query-string parameter.
    Query,
    /// A path parameter captured by the router.
    Path,
    /// The request body.
    Body,
}

impl fmt::Display for BindSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Query => write!(f, "query"),
            Self::Path => write!(f, "path"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Why binding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindErrorKind {
    /// A `required` value was empty after option resolution.
    MissingRequired,
    /// A value could not be coerced to the field's shape.
    InvalidValue,
    /// The JSON body could not be decoded.
    BodyDecode,
    /// The binding annotation carries an unknown or malformed option.
    MalformedOption,
    /// The field's type has no coercion.
    UnsupportedType,
}

impl BindErrorKind {
    /// Returns who is at fault for this kind of failure.
    #[must_use]
    pub const fn fault(self) -> FaultKind {
        match self {
            Self::MissingRequired | Self::InvalidValue | Self::BodyDecode => FaultKind::Caller,
            Self::MalformedOption | Self::UnsupportedType => FaultKind::Server,
        }
    }
}

/// A failure while binding request data onto an endpoint instance.
#[derive(Debug, Clone)]
pub struct BindError {
    source: BindSource,
    kind: BindErrorKind,
    field: &'static str,
    key: Option<String>,
    message: String,
}

impl BindError {
    /// A required value is missing.
    #[must_use]
    pub fn missing(source: BindSource, field: &'static str, key: &str) -> Self {
        Self {
            source,
            kind: BindErrorKind::MissingRequired,
            field,
            key: Some(key.to_string()),
            message: format!("missing required {source} parameter: {key}"),
        }
    }

    /// A value did not coerce.
    #[must_use]
    pub fn invalid_value(
        source: BindSource,
        field: &'static str,
        key: &str,
        details: impl fmt::Display,
    ) -> Self {
        Self {
            source,
            kind: BindErrorKind::InvalidValue,
            field,
            key: Some(key.to_string()),
            message: format!("invalid {source} parameter '{key}': {details}"),
        }
    }

    /// The request body is not valid JSON for the declared body type.
    #[must_use]
    pub fn body_decode(field: &'static str, details: impl fmt::Display) -> Self {
        Self {
            source: BindSource::Body,
            kind: BindErrorKind::BodyDecode,
            field,
            key: None,
            message: format!("failed to decode request body: {details}"),
        }
    }

    /// A binding option is unknown or malformed.
    #[must_use]
    pub fn malformed_option(source: BindSource, field: &'static str, option: &str) -> Self {
        Self {
            source,
            kind: BindErrorKind::MalformedOption,
            field,
            key: None,
            message: format!("invalid binding option `{option}` on field `{field}`"),
        }
    }

    /// The field's declared type cannot be bound.
    #[must_use]
    pub fn unsupported_type(source: BindSource, field: &'static str, type_name: &str) -> Self {
        Self {
            source,
            kind: BindErrorKind::UnsupportedType,
            field,
            key: None,
            message: format!("unsupported type `{type_name}` for {source} binding on field `{field}`"),
        }
    }

    /// Returns the request channel involved.
    #[must_use]
    pub fn source(&self) -> BindSource {
        self.source
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> BindErrorKind {
        self.kind
    }

    /// Returns the name of the endpoint field being bound.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the request key being read, when one applies.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the status written for this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind.fault() {
            FaultKind::Caller => StatusCode::BAD_REQUEST,
            FaultKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BindError {}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        match err.kind.fault() {
            FaultKind::Caller => Error::validation(err.message.clone()).with_cause(err),
            FaultKind::Server if err.kind == BindErrorKind::MalformedOption => {
                Error::wrap_with_message(err, "invalid binding option")
            }
            FaultKind::Server => Error::wrap(err),
        }
    }
}
