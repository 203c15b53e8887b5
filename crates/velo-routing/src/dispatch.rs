//! The dispatch table.
//!
//! A [`DispatchTable`] is built from a flattened route list: every
//! distinct path pattern becomes one matcher entry carrying a
//! method → route-id map, where the route id is the index into the
//! flattened list. Querying yields a matched route with its extracted
//! parameters, or the not-found / method-not-allowed errors.

use crate::route::Route;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use velo_core::{Error, PathParams, Result};

/// One matcher entry: a path pattern and the methods registered for it.
///
/// Entries are what the dispatch cache persists, so they carry methods as
/// plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// The path pattern registered with the matcher.
    pub path: String,
    /// `(method, route-id)` pairs in registration order.
    pub methods: Vec<(String, usize)>,
}

/// A route matched for one request.
#[derive(Debug)]
pub struct Matched<'a> {
    /// The matched route.
    pub route: &'a Route,
    /// Parameters extracted from the path.
    pub params: PathParams,
}

/// The query structure dispatch runs against.
pub struct DispatchTable {
    routes: Vec<Route>,
    entries: Vec<TableEntry>,
    matcher: matchit::Router<usize>,
}

impl DispatchTable {
    /// Builds a table from a flattened route list.
    ///
    /// Routes sharing a path pattern are merged into one matcher entry;
    /// when two routes register the same method on the same pattern, the
    /// later registration wins.
    pub fn build(routes: Vec<Route>) -> Result<Self> {
        let entries = registration_entries(&routes);
        Self::from_parts(routes, entries)
    }

    /// Rebuilds a table from a cached registration set.
    pub fn from_cached(routes: Vec<Route>, entries: Vec<TableEntry>) -> Result<Self> {
        Self::from_parts(routes, entries)
    }

    fn from_parts(routes: Vec<Route>, entries: Vec<TableEntry>) -> Result<Self> {
        let mut matcher = matchit::Router::new();
        for (index, entry) in entries.iter().enumerate() {
            matcher
                .insert(entry.path.clone(), index)
                .map_err(|err| Error::InvalidPattern {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                })?;
        }
        Ok(Self {
            routes,
            entries,
            matcher,
        })
    }

    /// The registration set, suitable for caching.
    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// The route with the given id.
    #[must_use]
    pub fn route(&self, id: usize) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Resolves a request line to a route.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when no pattern matches the path.
    /// - [`Error::MethodNotAllowed`] when a pattern matches but the
    ///   method is not registered for it; `allowed` lists the methods
    ///   that are.
    pub fn dispatch(&self, method: &Method, path: &str) -> Result<Matched<'_>> {
        let Ok(matched) = self.matcher.at(path) else {
            tracing::debug!(%method, path, "no route matched");
            return Err(Error::NotFound {
                method: method.clone(),
                path: path.to_string(),
            });
        };

        let entry = &self.entries[*matched.value];
        let Some((_, route_id)) = entry
            .methods
            .iter()
            .find(|(name, _)| name.as_str() == method.as_str())
        else {
            tracing::debug!(%method, path, pattern = %entry.path, "method not registered for pattern");
            return Err(Error::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
                allowed: entry
                    .methods
                    .iter()
                    .filter_map(|(name, _)| name.parse().ok())
                    .collect(),
            });
        };

        let Some(route) = self.routes.get(*route_id) else {
            return Err(Error::InvalidPattern {
                path: entry.path.clone(),
                reason: format!("route id {route_id} out of range"),
            });
        };

        tracing::debug!(%method, path, pattern = %entry.path, "route matched");
        Ok(Matched {
            route,
            params: matched
                .params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("routes", &self.routes.len())
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Derives the registration set from a flattened route list.
#[must_use]
pub fn registration_entries(routes: &[Route]) -> Vec<TableEntry> {
    let mut entries: Vec<TableEntry> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();

    for (route_id, route) in routes.iter().enumerate() {
        let entry_index = *by_path.entry(route.path().to_string()).or_insert_with(|| {
            entries.push(TableEntry {
                path: route.path().to_string(),
                methods: Vec::new(),
            });
            entries.len() - 1
        });

        for method in route.methods() {
            let methods = &mut entries[entry_index].methods;
            match methods
                .iter_mut()
                .find(|(name, _)| name.as_str() == method.as_str())
            {
                // Later registrations of the same method+pattern win.
                Some(slot) => slot.1 = route_id,
                None => methods.push((method.to_string(), route_id)),
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<Route> {
        vec![
            Route::new(Method::GET, "/", "home"),
            Route::new([Method::POST, Method::PUT], "/widgets", "widgets.save"),
            Route::new(Method::GET, "/widgets/{id}", "widgets.show"),
        ]
    }

    #[test]
    fn found_yields_route_and_params() {
        let table = DispatchTable::build(routes()).expect("valid patterns");
        let matched = table
            .dispatch(&Method::GET, "/widgets/42")
            .expect("matching route");

        assert_eq!(matched.route.path(), "/widgets/{id}");
        assert_eq!(matched.params.get("id"), Some("42"));
    }

    #[test]
    fn static_match_has_no_params() {
        let table = DispatchTable::build(routes()).expect("valid patterns");
        let matched = table.dispatch(&Method::GET, "/").expect("matching route");
        assert!(matched.params.is_empty());
        assert_eq!(matched.route.path(), "/");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let table = DispatchTable::build(routes()).expect("valid patterns");
        let err = table
            .dispatch(&Method::GET, "/nowhere")
            .expect_err("nothing registered there");
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn wrong_method_reports_the_allowed_set() {
        let table = DispatchTable::build(routes()).expect("valid patterns");
        let err = table
            .dispatch(&Method::GET, "/widgets")
            .expect_err("GET is not registered");

        match err {
            Error::MethodNotAllowed { allowed, .. } => {
                assert_eq!(allowed, [Method::POST, Method::PUT]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn routes_sharing_a_pattern_merge_methods() {
        let shared = vec![
            Route::new(Method::GET, "/thing", "thing.show"),
            Route::new(Method::DELETE, "/thing", "thing.remove"),
        ];
        let entries = registration_entries(&shared);

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].methods,
            [("GET".to_string(), 0), ("DELETE".to_string(), 1)]
        );
    }

    #[test]
    fn later_duplicate_registration_wins() {
        let duplicated = vec![
            Route::new(Method::GET, "/thing", "first"),
            Route::new(Method::GET, "/thing", "second"),
        ];
        let table = DispatchTable::build(duplicated).expect("valid patterns");
        let matched = table.dispatch(&Method::GET, "/thing").expect("match");

        assert!(
            matches!(matched.route.handler(), velo_core::HandlerRef::Named(name) if name == "second")
        );
    }

    #[test]
    fn cached_entries_round_trip() {
        let original = DispatchTable::build(routes()).expect("valid patterns");
        let entries = original.entries().to_vec();

        let rebuilt = DispatchTable::from_cached(routes(), entries).expect("valid cache");
        let matched = rebuilt
            .dispatch(&Method::PUT, "/widgets")
            .expect("matching route");
        assert_eq!(matched.route.path(), "/widgets");
    }

    #[test]
    fn conflicting_patterns_are_rejected() {
        let conflicting = vec![
            Route::new(Method::GET, "/a/{x}", "one"),
            Route::new(Method::GET, "/a/{y}", "two"),
        ];
        let err = DispatchTable::build(conflicting).expect_err("matcher rejects the overlap");
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
