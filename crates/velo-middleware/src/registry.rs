//! Middleware references and the name registry.
//!
//! Routes carry [`MiddlewareRef`]s, not middleware values: a reference is
//! either a ready `Arc<dyn Middleware>` or a name. Names are resolved
//! against the [`MiddlewareRegistry`] exactly once, when the chain for a
//! matched route is built; composition never sees unresolved names.

use crate::middleware::Middleware;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use velo_core::{Error, Result};

/// A reference to a middleware: a value or a resolvable name.
#[derive(Clone)]
pub enum MiddlewareRef {
    /// A middleware held directly.
    Value(Arc<dyn Middleware>),
    /// The name of a middleware registered on the application.
    Named(String),
}

impl MiddlewareRef {
    /// Wraps a middleware value.
    pub fn value(middleware: impl Middleware) -> Self {
        Self::Value(Arc::new(middleware))
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(middleware) => f
                .debug_tuple("MiddlewareRef::Value")
                .field(&middleware.name())
                .finish(),
            Self::Named(name) => f.debug_tuple("MiddlewareRef::Named").field(name).finish(),
        }
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareRef {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self::Value(middleware)
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// One-or-many middleware references, the argument shape of the
/// `middleware(..)` builders on routes and collections.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareStack(Vec<MiddlewareRef>);

impl MiddlewareStack {
    /// The references in declaration order.
    #[must_use]
    pub fn into_refs(self) -> Vec<MiddlewareRef> {
        self.0
    }
}

impl From<MiddlewareRef> for MiddlewareStack {
    fn from(reference: MiddlewareRef) -> Self {
        Self(vec![reference])
    }
}

impl From<&str> for MiddlewareStack {
    fn from(name: &str) -> Self {
        Self(vec![MiddlewareRef::from(name)])
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareStack {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self(vec![MiddlewareRef::from(middleware)])
    }
}

impl From<Vec<MiddlewareRef>> for MiddlewareStack {
    fn from(references: Vec<MiddlewareRef>) -> Self {
        Self(references)
    }
}

impl<const N: usize> From<[MiddlewareRef; N]> for MiddlewareStack {
    fn from(references: [MiddlewareRef; N]) -> Self {
        Self(references.into())
    }
}

impl<const N: usize> From<[&str; N]> for MiddlewareStack {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| MiddlewareRef::from(*name)).collect())
    }
}

/// Name → middleware registry.
#[derive(Default)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, Arc<dyn Middleware>>,
}

impl MiddlewareRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a middleware under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, middleware: impl Middleware) {
        self.entries.insert(name.into(), Arc::new(middleware));
    }

    /// Registers an already-shared middleware under `name`.
    pub fn insert_arc(&mut self, name: impl Into<String>, middleware: Arc<dyn Middleware>) {
        self.entries.insert(name.into(), middleware);
    }

    /// Looks up a middleware by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Middleware>> {
        self.entries.get(name).cloned()
    }

    /// Resolves a list of references into middleware values, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMiddleware`] for the first name with no
    /// registered middleware.
    pub fn resolve(&self, references: &[MiddlewareRef]) -> Result<Vec<Arc<dyn Middleware>>> {
        references
            .iter()
            .map(|reference| match reference {
                MiddlewareRef::Value(middleware) => Ok(Arc::clone(middleware)),
                MiddlewareRef::Named(name) => self
                    .get(name)
                    .ok_or_else(|| Error::UnknownMiddleware(name.clone())),
            })
            .collect()
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
