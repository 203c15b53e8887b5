//! Typed service registry.
//!
//! Collaborators (database pools, API clients, configuration values) are
//! registered on the application and looked up by type. The registry is
//! explicit wiring, not a process-wide singleton: it lives on the `App`
//! and is shared with whatever the `App` is shared with.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// A registry of shared services keyed by type.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use velo_core::Services;
///
/// struct Greeting(&'static str);
///
/// let mut services = Services::new();
/// services.insert(Arc::new(Greeting("hello")));
///
/// let greeting = services.get::<Greeting>().unwrap();
/// assert_eq!(greeting.0, "hello");
/// ```
#[derive(Default)]
pub struct Services {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Services {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any previous service of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.entries.insert(TypeId::of::<T>(), service);
    }

    /// Looks up a service by type.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| Arc::clone(entry).downcast::<T>().ok())
    }

    /// Whether a service of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// The number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("len", &self.entries.len())
            .finish()
    }
}
