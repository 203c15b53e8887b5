//! Handler traits and references.
//!
//! A [`Handler`] is the terminal stage of a middleware chain: it receives
//! the (possibly middleware-mutated) request plus the path parameters
//! extracted by the matcher, and produces a response or an error. The
//! [`handler_fn`] adapter lifts async closures into the trait and applies
//! the [`IntoResponse`](crate::IntoResponse) coercion to their return value.

use crate::error::Result;
use crate::types::{IntoResponse, Request, Response};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, the return shape of [`Handler::call`] and middleware.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Path parameters extracted by the matcher for one request.
///
/// Keys are the placeholder names from the route pattern, e.g. the pattern
/// `/hello/{name}` matched against `/hello/alice` yields `name = "alice"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value captured under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Adds a captured value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// The terminal request handler bound to a route.
pub trait Handler: Send + Sync {
    /// Handles the request, producing a response or an error.
    fn call(&self, request: Request, params: PathParams) -> BoxFuture<'static, Result<Response>>;
}

/// A reference to a handler: either a ready value or a name resolved
/// against the handler registry when the chain is built.
#[derive(Clone)]
pub enum HandlerRef {
    /// A handler held directly.
    Value(Arc<dyn Handler>),
    /// The name of a handler registered on the application.
    Named(String),
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("HandlerRef::Value(..)"),
            Self::Named(name) => f.debug_tuple("HandlerRef::Named").field(name).finish(),
        }
    }
}

impl From<Arc<dyn Handler>> for HandlerRef {
    fn from(handler: Arc<dyn Handler>) -> Self {
        Self::Value(handler)
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

struct FnHandler<F> {
    func: F,
}

impl<F, Fut, R> Handler for FnHandler<F>
where
    F: Fn(Request, PathParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, request: Request, params: PathParams) -> BoxFuture<'static, Result<Response>> {
        let fut = (self.func)(request, params);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

/// Lifts an async closure into a [`Handler`].
///
/// The closure may return any [`IntoResponse`](crate::IntoResponse) value;
/// plain strings become `200 OK` responses.
///
/// # Example
///
/// ```
/// use velo_core::handler_fn;
///
/// let handler = handler_fn(|_request, params| async move {
///     let name = params.get("name").unwrap_or("world").to_string();
///     Ok(format!("hello {name}"))
/// });
/// ```
pub fn handler_fn<F, Fut, R>(func: F) -> Arc<dyn Handler>
where
    F: Fn(Request, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(FnHandler { func })
}
