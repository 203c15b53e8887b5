//! The middleware trait and the `Next` continuation.

use std::future::Future;
use std::sync::Arc;
use velo_core::{BoxFuture, Request, Response, Result};

/// A stage that wraps the handling of a request.
///
/// Implementations receive the request and a [`Next`] continuation. They
/// may mutate the request before passing it on, post-process the response
/// coming back, or skip `next` entirely to short-circuit the chain.
pub trait Middleware: Send + Sync + 'static {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request.
    fn handle(&self, request: Request, next: Next) -> BoxFuture<'_, Result<Response>>;
}

/// The terminal stage of a chain, usually the matched route's handler.
pub type Terminal = Box<dyn FnOnce(Request) -> BoxFuture<'static, Result<Response>> + Send>;

enum NextInner {
    Stage {
        middleware: Arc<dyn Middleware>,
        next: Box<Next>,
    },
    Terminal(Terminal),
}

/// The remainder of a middleware chain.
///
/// `Next` is consumed by running it; a middleware that drops it without
/// calling [`run`](Next::run) short-circuits the chain and the terminal
/// handler never executes.
pub struct Next {
    inner: NextInner,
}

impl Next {
    /// Builds a chain tail consisting of just the terminal stage.
    pub fn terminal<F>(terminal: F) -> Self
    where
        F: FnOnce(Request) -> BoxFuture<'static, Result<Response>> + Send + 'static,
    {
        Self {
            inner: NextInner::Terminal(Box::new(terminal)),
        }
    }

    /// Wraps an existing tail in one more middleware stage.
    #[must_use]
    pub fn wrap(middleware: Arc<dyn Middleware>, next: Self) -> Self {
        Self {
            inner: NextInner::Stage {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Runs the remainder of the chain with `request`.
    pub async fn run(self, request: Request) -> Result<Response> {
        match self.inner {
            NextInner::Stage { middleware, next } => {
                tracing::trace!(middleware = middleware.name(), "entering middleware");
                middleware.handle(request, *next).await
            }
            NextInner::Terminal(terminal) => terminal(request).await,
        }
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            NextInner::Stage { middleware, .. } => f
                .debug_struct("Next")
                .field("middleware", &middleware.name())
                .finish_non_exhaustive(),
            NextInner::Terminal(_) => f.write_str("Next::Terminal"),
        }
    }
}

/// A middleware built from an async closure.
///
/// # Example
///
/// ```
/// use velo_middleware::{FnMiddleware, Next};
/// use velo_core::Request;
///
/// let passthrough = FnMiddleware::new("passthrough", |request: Request, next: Next| async move {
///     next.run(request).await
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a named middleware from `func`.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, request: Request, next: Next) -> BoxFuture<'_, Result<Response>> {
        Box::pin((self.func)(request, next))
    }
}
