//! The current-request scope.
//!
//! The request being handled is exposed through a Tokio task-local rather
//! than a field on the shared application value, so one application
//! instance can serve many requests concurrently without cross-talk. The
//! scope is entered by the kernel for the duration of a single `handle`
//! call; [`current`] fails loudly anywhere else.

use crate::error::{Error, Result};
use crate::types::Request;
use http::{HeaderMap, Method, Uri};
use std::future::Future;

tokio::task_local! {
    static CURRENT_REQUEST: CurrentRequest;
}

/// A snapshot of the request currently being handled.
///
/// The request body is owned by the middleware chain, so the snapshot
/// carries the request line and headers only.
#[derive(Debug, Clone)]
pub struct CurrentRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl CurrentRequest {
    /// Captures a snapshot of `request`.
    #[must_use]
    pub fn of(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Runs `fut` with `current` installed as the active request.
///
/// Scopes nest; the innermost one wins, so the kernel re-enters the scope
/// around the terminal handler with the middleware-mutated request.
pub fn enter<F: Future>(current: CurrentRequest, fut: F) -> impl Future<Output = F::Output> {
    CURRENT_REQUEST.scope(current, fut)
}

/// Returns the request currently being handled.
///
/// # Errors
///
/// Returns [`Error::OutsideRequestScope`] when called outside an active
/// `handle` call.
pub fn current() -> Result<CurrentRequest> {
    CURRENT_REQUEST
        .try_with(Clone::clone)
        .map_err(|_| Error::OutsideRequestScope)
}
