//! The application kernel.
//!
//! An [`App`] owns the root route collection, the registries that named
//! references resolve against, the typed service registry and the
//! provider list. [`App::handle`] turns one request into one response:
//! flatten the routes, build (or reuse) the dispatch table, resolve the
//! matched route's references, compose the middleware chain and run it.

use crate::config::AppConfig;
use crate::handlers::HandlerRegistry;
use crate::provider::ServiceProvider;
use crate::server::{ServeError, Server};
use http::header::ALLOW;
use http::HeaderValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use velo_core::scope::{self, CurrentRequest};
use velo_core::{
    BoxFuture, Error, Handler, Request, Response, ResponseExt, Result, Services,
};
use velo_middleware::{compose, Middleware, MiddlewareRegistry, MiddlewareStack};
use velo_routing::{
    fingerprint, DispatchCache, DispatchTable, FileDispatchCache, Methods, Route,
    RouteCollection,
};

/// How a request entered the application.
///
/// `Main` is an inbound HTTP request; `Sub` is an internal request made
/// while another one is being handled. Dispatch treats both identically;
/// the mode exists for middleware and logging to distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// An inbound request from a client.
    #[default]
    Main,
    /// An internal sub-request.
    Sub,
}

type ExceptionHook = Box<dyn Fn(&Error) -> Response + Send + Sync>;

/// The application kernel.
pub struct App {
    config: AppConfig,
    routes: RouteCollection,
    services: Services,
    handlers: HandlerRegistry,
    middleware: MiddlewareRegistry,
    providers: Vec<Arc<dyn ServiceProvider>>,
    booted: AtomicBool,
    exception_hook: Option<ExceptionHook>,
    cache: Option<Box<dyn DispatchCache>>,
}

impl App {
    /// Creates an application with the given configuration.
    ///
    /// When `route_cache_file` is configured, a [`FileDispatchCache`] is
    /// wired automatically; it stays dormant while `debug` is on.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let cache = config
            .route_cache_file()
            .map(|path| Box::new(FileDispatchCache::new(path)) as Box<dyn DispatchCache>);
        Self {
            config,
            routes: RouteCollection::new(),
            services: Services::new(),
            handlers: HandlerRegistry::new(),
            middleware: MiddlewareRegistry::new(),
            providers: Vec::new(),
            booted: AtomicBool::new(false),
            exception_hook: None,
            cache,
        }
    }

    /// The application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The typed service registry.
    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Mutable access to the service registry.
    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    /// Replaces the dispatch cache.
    pub fn with_dispatch_cache(&mut self, cache: Box<dyn DispatchCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    /// Registers a handler that routes can reference by name.
    pub fn register_handler(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(name, handler);
    }

    /// Registers a middleware that routes can reference by name.
    pub fn register_middleware(&mut self, name: impl Into<String>, middleware: impl Middleware) {
        self.middleware.insert(name, middleware);
    }

    /// Adds a service provider.
    ///
    /// The provider's `register` runs immediately; its `boot` runs with
    /// every other provider's, once, before the first request.
    pub fn register(&mut self, provider: Arc<dyn ServiceProvider>) {
        provider.register(self);
        self.providers.push(provider);
    }

    /// Installs the failure → response hook used when `handle` is asked
    /// to catch errors. Without a hook the default translation applies.
    pub fn exception(&mut self, hook: impl Fn(&Error) -> Response + Send + Sync + 'static) {
        self.exception_hook = Some(Box::new(hook));
    }

    /// The root route collection.
    #[must_use]
    pub fn routes(&self) -> &RouteCollection {
        &self.routes
    }

    /// Appends a route to the root collection.
    pub fn route(
        &mut self,
        methods: impl Into<Methods>,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.route(methods, path, handler)
    }

    /// Appends a `GET` route.
    pub fn get(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.get(path, handler)
    }

    /// Appends a `POST` route.
    pub fn post(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.post(path, handler)
    }

    /// Appends a `PUT` route.
    pub fn put(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.put(path, handler)
    }

    /// Appends a `DELETE` route.
    pub fn delete(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.delete(path, handler)
    }

    /// Appends an `OPTIONS` route.
    pub fn options(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.options(path, handler)
    }

    /// Appends a `PATCH` route.
    pub fn patch(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<velo_core::HandlerRef>,
    ) -> &mut Route {
        self.routes.patch(path, handler)
    }

    /// Creates a route group on the root collection.
    pub fn group(&mut self, build: impl FnOnce(&mut RouteCollection)) -> &mut RouteCollection {
        self.routes.group(build)
    }

    /// Appends middleware around every route of the application.
    pub fn middleware(&mut self, middleware: impl Into<MiddlewareStack>) -> &mut Self {
        self.routes.middleware(middleware);
        self
    }

    /// Boots every registered provider. Runs at most once; `handle`
    /// calls this before the first dispatch.
    pub fn boot(&self) {
        if self.booted.swap(true, Ordering::SeqCst) {
            return;
        }
        for provider in &self.providers {
            provider.boot(self);
        }
        tracing::debug!(providers = self.providers.len(), "application booted");
    }

    /// Handles one request.
    ///
    /// With `catch_errors` set, every failure is translated into a
    /// response (via the exception hook when installed); otherwise the
    /// error propagates to the caller. The current-request scope is
    /// active for the duration of the call.
    pub async fn handle(
        &self,
        request: Request,
        mode: RequestMode,
        catch_errors: bool,
    ) -> Result<Response> {
        self.boot();
        tracing::debug!(
            method = %request.method(),
            path = request.uri().path(),
            ?mode,
            "handling request"
        );

        let snapshot = CurrentRequest::of(&request);
        let outcome = scope::enter(snapshot, self.dispatch_request(request)).await;

        match outcome {
            Ok(response) => Ok(response),
            Err(err) if catch_errors => {
                tracing::debug!(error = %err, "translating failure into a response");
                Ok(self.render_error(&err))
            }
            Err(err) => Err(err),
        }
    }

    /// Serves the application over HTTP until shutdown.
    ///
    /// Every inbound request is handled as `(RequestMode::Main, catch
    /// errors)`. Terminates gracefully on SIGINT/SIGTERM.
    pub async fn run(self) -> std::result::Result<(), ServeError> {
        Server::new(Arc::new(self)).run().await
    }

    async fn dispatch_request(&self, request: Request) -> Result<Response> {
        let table = self.dispatch_table()?;
        let matched = table.dispatch(request.method(), request.uri().path())?;

        let stages = self.middleware.resolve(matched.route.middleware_refs())?;
        let handler = self.handlers.resolve(matched.route.handler())?;
        let params = matched.params;

        // Re-enter the scope around the terminal stage so the snapshot
        // reflects any mutation middleware made to the request.
        let terminal = move |request: Request| -> BoxFuture<'static, Result<Response>> {
            let snapshot = CurrentRequest::of(&request);
            Box::pin(scope::enter(snapshot, async move {
                handler.call(request, params).await
            }))
        };

        compose(&stages, terminal).run(request).await
    }

    /// Builds the dispatch table for the current route tree, reusing the
    /// cached registration set when the fingerprint matches.
    fn dispatch_table(&self) -> Result<DispatchTable> {
        let routes = self.routes.routes();

        let Some(cache) = self.active_cache() else {
            return DispatchTable::build(routes);
        };

        let key = fingerprint(&routes);
        match cache.get(&key) {
            Ok(Some(entries)) => {
                tracing::debug!("dispatch table reused from cache");
                return DispatchTable::from_cached(routes, entries);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "dispatch cache read failed, rebuilding");
            }
        }

        let table = DispatchTable::build(routes)?;
        if let Err(err) = cache.put(&key, table.entries()) {
            tracing::warn!(error = %err, "dispatch cache write failed");
        }
        Ok(table)
    }

    fn active_cache(&self) -> Option<&dyn DispatchCache> {
        if self.config.debug() {
            return None;
        }
        self.cache.as_deref()
    }

    fn render_error(&self, err: &Error) -> Response {
        if let Some(hook) = &self.exception_hook {
            return hook(err);
        }
        default_error_response(err, self.config.debug())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("providers", &self.providers.len())
            .field("booted", &self.booted.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// The default failure → response translation.
fn default_error_response(err: &Error, debug: bool) -> Response {
    let status = err.status_code();
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = if debug {
        format!("{reason}: {err}")
    } else {
        reason.to_string()
    };

    let mut response = Response::text(status, body);
    if let Some(allowed) = err.allowed_methods() {
        let list = allowed
            .iter()
            .map(http::Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if let Ok(value) = HeaderValue::from_str(&list) {
            response.headers_mut().insert(ALLOW, value);
        }
    }
    response
}
