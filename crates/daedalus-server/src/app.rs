//! The application: routes, endpoints and services.
//!
//! An [`Application`] is transport-agnostic. [`Server`](crate::Server) feeds
//! it requests from hyper; `daedalus-test` feeds it requests directly.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ALLOW};
use http::{Method, Request, Response, StatusCode};

use daedalus_bind::{respond, BindContext, Json};
use daedalus_core::{CancellationToken, Error, RequestContext, RequestId, Services};
use daedalus_router::{Resolution, RouteMatch, Router};

use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::endpoint::Endpoint;
use crate::error::ServerError;
use crate::registry::EndpointRegistry;

/// Response header carrying the request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A built application, ready to handle requests.
///
/// ```rust,ignore
/// let app = Application::builder()
///     .route::<Ping>(Method::GET, "/ping", "ping")
///     .route::<GetGame>(Method::GET, "/game/{id}", "getGame")
///     .service(Arc::new(GameStore::new()))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct Application {
    router: Router<Arc<str>>,
    endpoints: EndpointRegistry,
    services: Arc<Services>,
    max_body_bytes: usize,
}

impl Application {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// Returns the endpoint registry.
    #[must_use]
    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// Returns the service container.
    #[must_use]
    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// Largest accepted request body.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub(crate) fn set_max_body_bytes(&mut self, limit: usize) {
        self.max_body_bytes = limit;
    }

    /// Handles one request whose body has already been collected.
    ///
    /// `cancellation` is handed to the endpoint through its
    /// [`RequestContext`].
    pub async fn handle(
        &self,
        request: Request<Bytes>,
        cancellation: CancellationToken,
    ) -> Response<Bytes> {
        let request_id = RequestId::new();
        let response = self.route(request, request_id, cancellation).await;
        stamp(response, request_id)
    }

    async fn route(
        &self,
        request: Request<Bytes>,
        request_id: RequestId,
        cancellation: CancellationToken,
    ) -> Response<Bytes> {
        let (parts, body) = request.into_parts();
        tracing::debug!(%request_id, method = %parts.method, path = parts.uri.path(), "request received");

        if body.len() > self.max_body_bytes {
            return reject(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }

        let (name, params) = match self.router.resolve(&parts.method, parts.uri.path()) {
            Resolution::Matched(RouteMatch { target, params }) => (Arc::clone(target), params),
            Resolution::MethodNotAllowed(allowed) => {
                tracing::debug!(%request_id, method = %parts.method, "method not allowed");
                return method_not_allowed(&allowed);
            }
            Resolution::NotFound => {
                tracing::debug!(%request_id, path = parts.uri.path(), "no route");
                return reject(StatusCode::NOT_FOUND, "not found");
            }
        };

        let Some(endpoint) = self.endpoints.get(&name) else {
            tracing::error!(%request_id, endpoint = %name, "route points at an unregistered endpoint");
            return reject(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        };

        let ctx = RequestContext::new()
            .with_request_id(request_id)
            .with_endpoint(name)
            .with_cancellation(cancellation)
            .with_services(Arc::clone(&self.services));
        let bind_ctx = BindContext::new(parts.method, parts.uri, parts.headers, body, params);

        endpoint(ctx, bind_ctx).await.response
    }
}

/// Builder for [`Application`].
#[derive(Debug)]
pub struct ApplicationBuilder {
    router: Router<Arc<str>>,
    endpoints: EndpointRegistry,
    services: Services,
    max_body_bytes: usize,
    error: Option<ServerError>,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self {
            router: Router::new(),
            endpoints: EndpointRegistry::new(),
            services: Services::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            error: None,
        }
    }
}

impl ApplicationBuilder {
    /// Serves endpoint type `E` for `method` on `path` under `name`.
    ///
    /// Paths use `{param}` and `*wildcard` segments. The name appears in
    /// logs and must be unique.
    ///
    /// # Panics
    ///
    /// Panics if a wildcard segment is not the last segment of `path`.
    pub fn route<E: Endpoint>(mut self, method: Method, path: &str, name: &str) -> Self {
        if !self.endpoints.register::<E>(name) {
            self.error
                .get_or_insert_with(|| ServerError::DuplicateEndpoint(name.to_string()));
            return self;
        }
        self.router.route(method, path, Arc::from(name));
        self
    }

    /// Registers a collaborator endpoints can reach through
    /// [`RequestContext::service`].
    pub fn service<T: Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.services.register(service);
        self
    }

    /// Sets the body size limit for requests handled in memory.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Builds the application.
    pub fn build(self) -> Result<Application, ServerError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Application {
            router: self.router,
            endpoints: self.endpoints,
            services: Arc::new(self.services),
            max_body_bytes: self.max_body_bytes,
        })
    }
}

/// Error response for failures outside the endpoint pipeline.
pub(crate) fn reject(status: StatusCode, message: &str) -> Response<Bytes> {
    respond::<Json, ()>(Err(Error::with_status(status, message)))
}

fn method_not_allowed(allowed: &[Method]) -> Response<Bytes> {
    let mut response = reject(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    let allow = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

/// Adds the request id header.
pub(crate) fn stamp(mut response: Response<Bytes>, request_id: RequestId) -> Response<Bytes> {
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use daedalus_bind::{PlainText, Reply};
    use daedalus_macros::Bind;

    use crate::endpoint::{Enrich, Execute};

    struct Greeting(&'static str);

    #[derive(Default, Bind)]
    struct Hello {
        #[bind(path = "name")]
        name: String,
    }

    impl Enrich for Hello {}

    impl Execute for Hello {
        type Output = String;

        async fn execute(&self, ctx: &RequestContext) -> Result<Reply<String>, Error> {
            let greeting = ctx.service::<Greeting>()?;
            Ok(Reply::ok(format!("{} {}", greeting.0, self.name)))
        }
    }

    impl Endpoint for Hello {
        type Format = PlainText;
    }

    fn app() -> Application {
        Application::builder()
            .route::<Hello>(Method::GET, "/hello/{name}", "hello")
            .service(Arc::new(Greeting("hi")))
            .max_body_bytes(8)
            .build()
            .unwrap()
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_matched_route_runs_endpoint() {
        let response = app()
            .handle(request(Method::GET, "/hello/ada", ""), CancellationToken::new())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"hi ada");
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = app()
            .handle(request(Method::GET, "/nope", ""), CancellationToken::new())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().as_ref(), br#"{"error":"not found"}"#);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_wrong_method_is_405_with_allow() {
        let response = app()
            .handle(request(Method::DELETE, "/hello/ada", ""), CancellationToken::new())
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let response = app()
            .handle(
                request(Method::GET, "/hello/ada", "0123456789"),
                CancellationToken::new(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_missing_service_is_500() {
        let app = Application::builder()
            .route::<Hello>(Method::GET, "/hello/{name}", "hello")
            .build()
            .unwrap();
        let response = app
            .handle(request(Method::GET, "/hello/ada", ""), CancellationToken::new())
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_name_fails_build() {
        let result = Application::builder()
            .route::<Hello>(Method::GET, "/a/{name}", "hello")
            .route::<Hello>(Method::GET, "/b/{name}", "hello")
            .build();
        assert!(matches!(result, Err(ServerError::DuplicateEndpoint(name)) if name == "hello"));
    }
}
