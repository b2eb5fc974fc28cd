//! Request data as seen by the binder.
//!
//! A [`BindContext`] owns everything the Bind and Enrich stages may read:
//! method, URI, headers, the collected body, path parameters from the router
//! and the decoded query string.

use std::borrow::Cow;

use bytes::Bytes;
use daedalus_router::Params;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::error::BindSource;

/// Read-only view of one request.
///
/// ```
/// use daedalus_bind::{BindContext, BindSource};
/// use http::Method;
///
/// let ctx = BindContext::builder()
///     .method(Method::GET)
///     .uri("/game/7?verbose=true")
///     .header("x-player", "ada")
///     .path_param("id", "7")
///     .build();
///
/// assert_eq!(ctx.lookup(BindSource::Path, "id").as_deref(), Some("7"));
/// assert_eq!(ctx.lookup(BindSource::Query, "verbose").as_deref(), Some("true"));
/// assert_eq!(ctx.lookup(BindSource::Header, "X-Player").as_deref(), Some("ada"));
/// ```
#[derive(Debug, Clone)]
pub struct BindContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    query: Vec<(String, String)>,
}

impl BindContext {
    /// Creates a context from request parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes, path_params: Params) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            query,
        }
    }

    /// Starts a builder, mostly useful in tests.
    #[must_use]
    pub fn builder() -> BindContextBuilder {
        BindContextBuilder::default()
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the first value of a header.
    ///
    /// Bytes outside visible ASCII are decoded as UTF-8, with invalid
    /// sequences replaced, so a present header is never reported as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }

    /// Returns the first value of a decoded query parameter.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the path parameters captured by the router.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns the collected request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Reads the raw value for `key` from the given channel.
    ///
    /// The body is not a keyed channel and always yields `None`.
    #[must_use]
    pub fn lookup(&self, source: BindSource, key: &str) -> Option<Cow<'_, str>> {
        match source {
            BindSource::Header => self.header(key),
            BindSource::Query => self.query(key).map(Cow::Borrowed),
            BindSource::Path => self.path_params.get(key).map(Cow::Borrowed),
            BindSource::Body => None,
        }
    }
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
        Ok(pairs) => pairs,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring undecodable query string");
            Vec::new()
        }
    }
}

/// Builder for [`BindContext`].
#[derive(Debug, Default)]
pub struct BindContextBuilder {
    method: Method,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl BindContextBuilder {
    /// Sets the method. Defaults to GET.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI. Unparseable input leaves the default `/`.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.parse().ok();
        self
    }

    /// Appends a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> BindContext {
        BindContext::new(
            self.method,
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
            self.path_params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_percent_decoded() {
        let ctx = BindContext::builder().uri("/search?name=ada%20lovelace&tag=a+b").build();
        assert_eq!(ctx.query("name"), Some("ada lovelace"));
        assert_eq!(ctx.query("tag"), Some("a b"));
    }

    #[test]
    fn test_first_query_value_wins() {
        let ctx = BindContext::builder().uri("/?id=1&id=2").build();
        assert_eq!(ctx.lookup(BindSource::Query, "id").as_deref(), Some("1"));
    }

    #[test]
    fn test_first_header_value_wins() {
        let ctx = BindContext::builder()
            .header("x-id", "first")
            .header("x-id", "second")
            .build();
        assert_eq!(ctx.lookup(BindSource::Header, "x-id").as_deref(), Some("first"));
    }

    #[test]
    fn test_non_ascii_header_is_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-name"),
            HeaderValue::from_bytes("café".as_bytes()).unwrap(),
        );
        headers.insert(
            HeaderName::from_static("x-raw"),
            HeaderValue::from_bytes(b"a\xffb").unwrap(),
        );
        let ctx = BindContext::new(
            Method::GET,
            Uri::from_static("/"),
            headers,
            Bytes::new(),
            Params::new(),
        );
        assert_eq!(ctx.header("x-name").as_deref(), Some("café"));
        assert_eq!(ctx.lookup(BindSource::Header, "x-raw").as_deref(), Some("a\u{fffd}b"));
    }

    #[test]
    fn test_missing_values() {
        let ctx = BindContext::builder().uri("/game").build();
        assert!(ctx.lookup(BindSource::Query, "id").is_none());
        assert!(ctx.lookup(BindSource::Header, "x-id").is_none());
        assert!(ctx.lookup(BindSource::Path, "id").is_none());
        assert!(ctx.lookup(BindSource::Body, "anything").is_none());
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = BindContext::builder().build();
        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.body().is_empty());
    }
}
