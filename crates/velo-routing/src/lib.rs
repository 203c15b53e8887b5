//! Routing for the Velo web framework.
//!
//! Routes are declared on a [`RouteCollection`], a tree of routes and
//! nested groups. A group contributes a path prefix and a middleware list
//! to every route beneath it. [`RouteCollection::routes`] flattens the
//! tree into a plain route list, which [`DispatchTable::build`] turns
//! into a matcher query structure.
//!
//! The low-level path matching is delegated to the `matchit` crate; this
//! crate never inspects pattern syntax itself.

pub mod cache;
pub mod collection;
pub mod dispatch;
pub mod route;

pub use cache::{fingerprint, DispatchCache, FileDispatchCache};
pub use collection::{RouteCollection, RouteEntry};
pub use dispatch::{DispatchTable, Matched, TableEntry};
pub use route::{Methods, Route};
