//! HTTP server.
//!
//! The server binds a [`TcpListener`], serves each connection with hyper
//! (HTTP/1.1 and HTTP/2 auto-detected) and hands collected requests to the
//! [`Application`]. On shutdown it stops accepting, asks open connections
//! to finish their in-flight requests and waits up to the configured
//! shutdown timeout.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::{TcpListener, TcpStream};

use daedalus_core::{CancellationToken, RequestId};

use crate::app::{reject, stamp, Application};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

type ConnectionError = Box<dyn std::error::Error + Send + Sync>;

/// The Daedalus HTTP server.
///
/// ```rust,ignore
/// let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
/// Server::new(config, app).run().await?;
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    app: Arc<Application>,
}

impl Server {
    /// Creates a server. The configured body limit replaces the
    /// application's.
    #[must_use]
    pub fn new(config: ServerConfig, mut app: Application) -> Self {
        app.set_max_body_bytes(config.max_body_bytes());
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application.
    #[must_use]
    pub fn application(&self) -> &Arc<Application> {
        &self.app
    }

    /// Runs until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` fires.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// fires.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(err) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(%remote_addr, error = %err, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_secs = shutdown_timeout.as_secs(),
            "waiting for open connections"
        );

        if tokio::time::timeout(shutdown_timeout, tracker.wait_idle()).await.is_err() {
            tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), ConnectionError> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let request_shutdown = shutdown.clone();

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            let shutdown = request_shutdown.clone();
            async move { Ok::<_, Infallible>(server.handle_request(req, shutdown).await) }
        });

        let builder = auto::Builder::new(TokioExecutor::new());
        let conn = builder.serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "draining connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>, shutdown: ShutdownSignal) -> HttpResponse {
        // Dropped when the request finishes or hyper abandons it because the
        // client went away.
        let cancellation = CancellationToken::new();
        let _guard = cancellation.drop_guard();

        let watcher = cancellation.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.recv() => watcher.cancel(),
                () = watcher.cancelled() => {}
            }
        });

        let (parts, body) = req.into_parts();
        let limited = Limited::new(body, self.config.max_body_bytes());
        let collected = tokio::time::timeout(self.config.request_timeout(), limited.collect()).await;

        let body = match collected {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(err)) if err.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::debug!(limit = self.config.max_body_bytes(), "request body too large");
                return rejected(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
            }
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "failed to read request body");
                return rejected(StatusCode::BAD_REQUEST, "failed to read request body");
            }
            Err(_) => {
                tracing::warn!(path = parts.uri.path(), "request body collection timed out");
                return rejected(StatusCode::REQUEST_TIMEOUT, "request body timed out");
            }
        };

        self.app
            .handle(Request::from_parts(parts, body), cancellation.clone())
            .await
            .map(Full::new)
    }
}

fn rejected(status: StatusCode, message: &str) -> HttpResponse {
    stamp(reject(status, message), RequestId::new()).map(Full::new)
}
