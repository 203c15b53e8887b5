//! The name → handler registry.
//!
//! Routes may reference their handler by name instead of holding the
//! value; the name is looked up here when the chain for a matched route
//! is built.

use std::collections::HashMap;
use std::sync::Arc;
use velo_core::{Error, Handler, HandlerRef, Result};

/// Name → handler registry.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        self.entries.insert(name.into(), handler);
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.entries.get(name).cloned()
    }

    /// Resolves a handler reference to a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandler`] when a named reference has no
    /// registered handler.
    pub fn resolve(&self, reference: &HandlerRef) -> Result<Arc<dyn Handler>> {
        match reference {
            HandlerRef::Value(handler) => Ok(Arc::clone(handler)),
            HandlerRef::Named(name) => self
                .get(name)
                .ok_or_else(|| Error::UnknownHandler(name.clone())),
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
