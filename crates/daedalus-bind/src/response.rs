//! Response strategy.
//!
//! Execute produces a `Result<Reply<T>, Error>`; [`respond`] turns it into a
//! wire response through a serializer chosen by the endpoint's type.
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | `Ok(Reply::Empty)` | 200 | serializer's empty body |
//! | `Ok(Reply::Status(s, v))` | `s` | `v` serialized, or nothing |
//! | `Ok(Reply::Value(v))` | 200 | `v` serialized |
//! | `Err(e)` | `e.status()` | `e.public_message()` |
//!
//! Two serializers ship with the crate:
//!
//! | Serializer | Content-Type | Values | Empty | Errors |
//! |------------|--------------|--------|-------|--------|
//! | [`PlainText`] | `text/plain; charset=utf-8` | `Display` | nothing | message text |
//! | [`Json`] | `application/json` | `Serialize` | `{}` | `{"error": message}` |

use std::fmt;

use bytes::Bytes;
use daedalus_core::Error;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use serde::Serialize;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// What Execute hands to Respond on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// No value: 200 with the serializer's empty body.
    Empty,
    /// Explicit status, with or without a body.
    Status(StatusCode, Option<T>),
    /// A business value: 200 with the value serialized.
    Value(T),
}

impl<T> Reply<T> {
    /// 200 with `value`.
    pub fn ok(value: T) -> Self {
        Self::Value(value)
    }

    /// 201 with no body.
    pub fn created() -> Self {
        Self::Status(StatusCode::CREATED, None)
    }

    /// Explicit status and body.
    pub fn with_status(status: StatusCode, value: T) -> Self {
        Self::Status(status, Some(value))
    }

    /// Returns the status this reply will be written with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Status(status, _) => *status,
            Self::Empty | Self::Value(_) => StatusCode::OK,
        }
    }
}

/// A serialized body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Content type of `body`.
    pub content_type: &'static str,
    /// Serialized bytes.
    pub body: Bytes,
}

impl Encoded {
    fn new(content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            body: body.into(),
        }
    }
}

/// Body conventions of a serializer that do not depend on the value type.
pub trait Format: Send + Sync + 'static {
    /// Body for [`Reply::Empty`].
    fn empty() -> Encoded;

    /// Body carrying an error message.
    fn message(message: &str) -> Encoded;
}

/// Serialization of values of type `T`.
pub trait Encode<T: ?Sized>: Format {
    /// Serializes `value`. Must not fail: serializers degrade instead.
    fn encode(value: &T) -> Encoded;
}

/// Plain-text serializer: values are written with `Display`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Format for PlainText {
    fn empty() -> Encoded {
        Encoded::new(TEXT_PLAIN, Bytes::new())
    }

    fn message(message: &str) -> Encoded {
        Encoded::new(TEXT_PLAIN, message.to_owned())
    }
}

impl<T: fmt::Display + ?Sized> Encode<T> for PlainText {
    fn encode(value: &T) -> Encoded {
        Encoded::new(TEXT_PLAIN, value.to_string())
    }
}

/// JSON serializer.
///
/// If a value fails to serialize (a map with non-string keys, a failing
/// custom `Serialize`), the body falls back to the value's `Debug` text as
/// plain text and a warning is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl Format for Json {
    fn empty() -> Encoded {
        Encoded::new(APPLICATION_JSON, Bytes::from_static(b"{}"))
    }

    fn message(message: &str) -> Encoded {
        match serde_json::to_vec(&ErrorBody { error: message }) {
            Ok(body) => Encoded::new(APPLICATION_JSON, body),
            Err(_) => PlainText::message(message),
        }
    }
}

impl<T: Serialize + fmt::Debug + ?Sized> Encode<T> for Json {
    fn encode(value: &T) -> Encoded {
        match serde_json::to_vec(value) {
            Ok(body) => Encoded::new(APPLICATION_JSON, body),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    value_type = std::any::type_name::<T>(),
                    "JSON serialization failed, falling back to plain text"
                );
                Encoded::new(TEXT_PLAIN, format!("{value:?}"))
            }
        }
    }
}

/// Turns an Execute outcome into a response using serializer `F`.
///
/// ```
/// use daedalus_bind::{respond, Json, PlainText, Reply};
/// use daedalus_core::Error;
/// use http::StatusCode;
///
/// let ok = respond::<PlainText, _>(Ok(Reply::ok("pong")));
/// assert_eq!(ok.status(), StatusCode::OK);
/// assert_eq!(ok.body().as_ref(), b"pong");
///
/// let missing = respond::<Json, ()>(Err(Error::not_found("game does not exist")));
/// assert_eq!(missing.status(), StatusCode::NOT_FOUND);
/// assert_eq!(missing.body().as_ref(), br#"{"error":"game does not exist"}"#);
/// ```
pub fn respond<F, T>(outcome: Result<Reply<T>, Error>) -> Response<Bytes>
where
    F: Encode<T>,
{
    let (status, encoded) = match outcome {
        Ok(Reply::Empty) => (StatusCode::OK, F::empty()),
        Ok(Reply::Status(status, Some(value))) => (status, F::encode(&value)),
        Ok(Reply::Status(status, None)) => (status, Encoded::new(F::empty().content_type, Bytes::new())),
        Ok(Reply::Value(value)) => (StatusCode::OK, F::encode(&value)),
        Err(err) => (err.status(), F::message(err.public_message())),
    };

    let mut response = Response::new(encoded.body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(encoded.content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn body(response: &Response<Bytes>) -> &str {
        std::str::from_utf8(response.body()).unwrap()
    }

    fn content_type(response: &Response<Bytes>) -> &str {
        response.headers()[CONTENT_TYPE].to_str().unwrap()
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Game {
        player_count: i64,
    }

    #[test]
    fn test_empty_reply() {
        let text = respond::<PlainText, String>(Ok(Reply::Empty));
        assert_eq!(text.status(), StatusCode::OK);
        assert_eq!(body(&text), "");

        let json = respond::<Json, Game>(Ok(Reply::Empty));
        assert_eq!(json.status(), StatusCode::OK);
        assert_eq!(body(&json), "{}");
        assert_eq!(content_type(&json), APPLICATION_JSON);
    }

    #[test]
    fn test_explicit_status_overrides_default() {
        let created = respond::<Json, Game>(Ok(Reply::created()));
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(body(&created), "");

        let accepted = respond::<Json, _>(Ok(Reply::with_status(
            StatusCode::ACCEPTED,
            Game { player_count: 4 },
        )));
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);
        assert_eq!(body(&accepted), r#"{"playerCount":4}"#);
    }

    #[test]
    fn test_value_is_serialized_with_200() {
        let json = respond::<Json, _>(Ok(Reply::ok(Game { player_count: 2 })));
        assert_eq!(json.status(), StatusCode::OK);
        assert_eq!(body(&json), r#"{"playerCount":2}"#);

        let text = respond::<PlainText, _>(Ok(Reply::ok(42)));
        assert_eq!(body(&text), "42");
        assert_eq!(content_type(&text), TEXT_PLAIN);
    }

    #[test]
    fn test_error_uses_its_own_status() {
        let text = respond::<PlainText, String>(Err(Error::not_found("game does not exist")));
        assert_eq!(text.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&text), "game does not exist");
    }

    #[test]
    fn test_server_fault_message_is_sanitized() {
        let err = Error::wrap(std::io::Error::other("secret connection string"));
        let json = respond::<Json, Game>(Err(err));
        assert_eq!(json.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&json), r#"{"error":"internal server error"}"#);
    }

    #[test]
    fn test_json_failure_falls_back_to_text() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        let response = respond::<Json, _>(Ok(Reply::ok(map)));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), TEXT_PLAIN);
        assert!(body(&response).contains("tuple keys"));
    }

    #[test]
    fn test_reply_status() {
        assert_eq!(Reply::<()>::Empty.status(), StatusCode::OK);
        assert_eq!(Reply::<()>::created().status(), StatusCode::CREATED);
        assert_eq!(Reply::ok(1).status(), StatusCode::OK);
    }
}
