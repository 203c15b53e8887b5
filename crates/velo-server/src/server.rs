//! The HTTP server.
//!
//! Binds the configured address and serves the application with Hyper.
//! Each connection runs on its own task; shutdown stops accepting and
//! drains in-flight connections up to the configured timeout.

use crate::app::{App, RequestMode};
use crate::shutdown::ShutdownSignal;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use velo_core::{Request, Response, ResponseExt};

/// Errors starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The configured bind address does not parse.
    #[error("invalid bind address `{addr}`: {source}")]
    InvalidAddr {
        /// The configured address.
        addr: String,
        /// The parse failure.
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

/// Serves an [`App`] over HTTP/1.
pub struct Server {
    app: Arc<App>,
    shutdown: Option<ShutdownSignal>,
}

impl Server {
    /// Creates a server for `app`.
    #[must_use]
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            shutdown: None,
        }
    }

    /// Uses `signal` instead of the default SIGINT/SIGTERM wiring.
    #[must_use]
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = Some(signal);
        self
    }

    /// Runs until shutdown is triggered.
    pub async fn run(self) -> Result<(), ServeError> {
        let shutdown = self
            .shutdown
            .clone()
            .unwrap_or_else(ShutdownSignal::with_os_signals);
        self.serve(shutdown).await
    }

    async fn serve(self, shutdown: ShutdownSignal) -> Result<(), ServeError> {
        let config_addr = self.app.config().http_addr().to_string();
        let addr = self
            .app
            .config()
            .socket_addr()
            .map_err(|source| ServeError::InvalidAddr {
                addr: config_addr.clone(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: config_addr,
                source,
            })?;

        tracing::info!(%addr, "server listening");

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let app = Arc::clone(&self.app);
                            connections.spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |request| {
                                    serve_request(Arc::clone(&app), request)
                                });
                                if let Err(err) =
                                    http1::Builder::new().serve_connection(io, service).await
                                {
                                    tracing::debug!(%peer, error = %err, "connection closed with error");
                                }
                            });
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "accept failed");
                        }
                    }
                }
                () = shutdown.wait() => {
                    tracing::info!("shutdown requested, draining connections");
                    break;
                }
            }
        }

        let timeout = self.app.config().shutdown_timeout();
        let drain = async {
            while connections.join_next().await.is_some() {}
        };
        if tokio::time::timeout(timeout, drain).await.is_err() {
            tracing::warn!(?timeout, "shutdown timeout reached, aborting open connections");
            connections.shutdown().await;
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Buffers one inbound request and hands it to the kernel.
async fn serve_request(
    app: Arc<App>,
    request: hyper::Request<hyper::body::Incoming>,
) -> Result<Response, Infallible> {
    let (parts, body) = request.into_parts();
    let body = match body.collect().await {
        Ok(collected) => Full::new(collected.to_bytes()),
        Err(err) => {
            tracing::debug!(error = %err, "failed to read request body");
            return Ok(Response::text(StatusCode::BAD_REQUEST, "Bad Request"));
        }
    };

    let request = Request::from_parts(parts, body);
    match app.handle(request, RequestMode::Main, true).await {
        Ok(response) => Ok(response),
        // handle() with catch_errors translates failures itself; anything
        // arriving here fell through the translation.
        Err(err) => {
            tracing::error!(error = %err, "request failed after error translation");
            Ok(Response::text(err.status_code(), "Internal Server Error"))
        }
    }
}
