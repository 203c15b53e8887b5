//! The Velo error taxonomy.
//!
//! Every failure surfaced by dispatch, chain construction or a handler is
//! one variant of [`Error`]. The kernel maps each variant to an HTTP
//! status when converting a failure into a response.

use http::{Method, StatusCode};

/// Result alias used throughout Velo.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while dispatching and handling a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered route matches the request path.
    #[error("no route found for {method} {path}")]
    NotFound {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// A route matches the path but not the request method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
        /// Methods that would have matched the path.
        allowed: Vec<Method>,
    },

    /// The current-request accessor was used outside an active `handle` call.
    #[error("outside of request scope")]
    OutsideRequestScope,

    /// A route referenced a handler name with no registered handler.
    #[error("no handler registered under the name `{0}`")]
    UnknownHandler(String),

    /// A route referenced a middleware name with no registered middleware.
    #[error("no middleware registered under the name `{0}`")]
    UnknownMiddleware(String),

    /// A route pattern was rejected by the path matcher.
    #[error("invalid route pattern `{path}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        path: String,
        /// The matcher's rejection message.
        reason: String,
    },

    /// An opaque handler or middleware failure.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl Error {
    /// Wraps an arbitrary failure as a handler error.
    pub fn handler(err: impl Into<anyhow::Error>) -> Self {
        Self::Handler(err.into())
    }

    /// The HTTP status this error translates to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::OutsideRequestScope
            | Self::UnknownHandler(_)
            | Self::UnknownMiddleware(_)
            | Self::InvalidPattern { .. }
            | Self::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The methods a `MethodNotAllowed` failure would have accepted.
    #[must_use]
    pub fn allowed_methods(&self) -> Option<&[Method]> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = Error::NotFound {
            method: Method::GET,
            path: "/missing".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.allowed_methods().is_none());
    }

    #[test]
    fn method_not_allowed_maps_to_405_with_allowed_set() {
        let err = Error::MethodNotAllowed {
            method: Method::GET,
            path: "/".to_string(),
            allowed: vec![Method::POST, Method::PUT],
        };
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.allowed_methods(), Some(&[Method::POST, Method::PUT][..]));
    }

    #[test]
    fn unresolvable_references_map_to_500() {
        assert_eq!(
            Error::UnknownHandler("missing".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::UnknownMiddleware("missing".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn handler_failures_map_to_500() {
        let err = Error::handler(anyhow::anyhow!("boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn scope_violation_message() {
        assert_eq!(
            Error::OutsideRequestScope.to_string(),
            "outside of request scope"
        );
    }
}
