//! Route collections: the declaration tree and its flattening.

use crate::route::{Methods, Route};
use http::Method;
use velo_core::HandlerRef;
use velo_middleware::{MiddlewareRef, MiddlewareStack};

/// One element of a collection: a leaf route or a nested group.
#[derive(Debug, Clone)]
pub enum RouteEntry {
    /// A leaf route.
    Route(Route),
    /// A nested collection.
    Group(RouteCollection),
}

/// An ordered tree of routes and nested groups.
///
/// A collection contributes a path prefix and a middleware list to every
/// route beneath it. [`routes`](RouteCollection::routes) flattens the
/// tree into a plain list without mutating it; prefixes compose
/// outermost-first and middleware accumulates route-level first, then
/// groups innermost to outermost.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    elements: Vec<RouteEntry>,
    prefix: String,
    middleware: Vec<MiddlewareRef>,
}

impl RouteCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the path prefix prepended to every descendant route.
    pub fn prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    /// Appends middleware applied around every descendant route.
    pub fn middleware(&mut self, middleware: impl Into<MiddlewareStack>) -> &mut Self {
        self.middleware.extend(middleware.into().into_refs());
        self
    }

    /// Creates a nested group, populates it with `build` and returns it
    /// for further chaining (`.prefix(..)`, `.middleware(..)`).
    pub fn group(&mut self, build: impl FnOnce(&mut RouteCollection)) -> &mut RouteCollection {
        let mut child = RouteCollection::new();
        build(&mut child);
        self.elements.push(RouteEntry::Group(child));
        if let Some(RouteEntry::Group(group)) = self.elements.last_mut() {
            group
        } else {
            unreachable!("a group was just pushed")
        }
    }

    /// Appends a route and returns it for further chaining.
    pub fn route(
        &mut self,
        methods: impl Into<Methods>,
        path: impl Into<String>,
        handler: impl Into<HandlerRef>,
    ) -> &mut Route {
        self.elements
            .push(RouteEntry::Route(Route::new(methods, path, handler)));
        if let Some(RouteEntry::Route(route)) = self.elements.last_mut() {
            route
        } else {
            unreachable!("a route was just pushed")
        }
    }

    /// Appends a `GET` route.
    pub fn get(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::GET, path, handler)
    }

    /// Appends a `POST` route.
    pub fn post(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::POST, path, handler)
    }

    /// Appends a `PUT` route.
    pub fn put(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::PUT, path, handler)
    }

    /// Appends a `DELETE` route.
    pub fn delete(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::DELETE, path, handler)
    }

    /// Appends an `OPTIONS` route.
    pub fn options(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::OPTIONS, path, handler)
    }

    /// Appends a `PATCH` route.
    pub fn patch(&mut self, path: impl Into<String>, handler: impl Into<HandlerRef>) -> &mut Route {
        self.route(Method::PATCH, path, handler)
    }

    /// Whether the collection declares no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Flattens the tree into a route list.
    ///
    /// Elements are walked depth-first in declaration order; nested
    /// groups are flattened recursively and spliced in place; leaf routes
    /// are cloned. Afterwards this collection's own prefix and middleware
    /// are applied to every route in the assembled output, which is what
    /// makes prefixes compose outermost-first and group middleware wrap
    /// outside route-level middleware.
    ///
    /// The tree itself is never mutated; calling this repeatedly yields
    /// the same result.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        let mut flattened = Vec::new();
        for entry in &self.elements {
            match entry {
                RouteEntry::Route(route) => flattened.push(route.clone()),
                RouteEntry::Group(group) => flattened.extend(group.routes()),
            }
        }

        for route in &mut flattened {
            if !self.prefix.is_empty() {
                route.prefix(&self.prefix);
            }
            if !self.middleware.is_empty() {
                route.middleware(self.middleware.clone());
            }
        }

        flattened
    }
}
