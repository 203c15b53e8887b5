//! A single route.

use http::Method;
use velo_core::HandlerRef;
use velo_middleware::{MiddlewareRef, MiddlewareStack};

/// One-or-many HTTP methods, the argument shape of
/// [`Route::new`] and `RouteCollection::route`.
#[derive(Debug, Clone)]
pub struct Methods(Vec<Method>);

impl Methods {
    /// The methods in declaration order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Method> {
        self.0
    }
}

impl From<Method> for Methods {
    fn from(method: Method) -> Self {
        Self(vec![method])
    }
}

impl From<Vec<Method>> for Methods {
    fn from(methods: Vec<Method>) -> Self {
        Self(methods)
    }
}

impl<const N: usize> From<[Method; N]> for Methods {
    fn from(methods: [Method; N]) -> Self {
        Self(methods.into())
    }
}

/// A route: methods, a path pattern, a handler reference and an ordered
/// middleware list.
///
/// The path is a pattern in the matcher's syntax (`{name}` placeholders);
/// it is not prefix-resolved until the owning collection is flattened.
/// Routes are plain values: flattening clones them, so mutating the
/// source tree afterwards never affects an already-flattened list.
#[derive(Debug, Clone)]
pub struct Route {
    methods: Vec<Method>,
    path: String,
    handler: HandlerRef,
    middleware: Vec<MiddlewareRef>,
}

impl Route {
    /// Creates a route with an empty middleware list.
    ///
    /// # Panics
    ///
    /// Panics when `methods` is empty; a route that matches no method is
    /// a programming error.
    pub fn new(
        methods: impl Into<Methods>,
        path: impl Into<String>,
        handler: impl Into<HandlerRef>,
    ) -> Self {
        let methods = methods.into().into_vec();
        assert!(!methods.is_empty(), "a route requires at least one HTTP method");
        Self {
            methods,
            path: path.into(),
            handler: handler.into(),
            middleware: Vec::new(),
        }
    }

    /// The methods this route responds to.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The (possibly not yet prefix-resolved) path pattern.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The handler reference.
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// The middleware references in declaration order.
    #[must_use]
    pub fn middleware_refs(&self) -> &[MiddlewareRef] {
        &self.middleware
    }

    /// Prepends `prefix` to the path. Plain string concatenation; no
    /// slash normalization happens here.
    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        self.path = format!("{prefix}{}", self.path);
        self
    }

    /// Appends middleware, preserving the order given.
    pub fn middleware(&mut self, middleware: impl Into<MiddlewareStack>) -> &mut Self {
        self.middleware.extend(middleware.into().into_refs());
        self
    }
}
