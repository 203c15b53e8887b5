//! Velo is a micro web-application framework.
//!
//! Routes are declared on an [`App`] (or grouped on nested
//! [`RouteCollection`]s with shared prefixes and middleware), each request
//! is matched to a route, and the route's middleware chain wraps its
//! handler. The HTTP plumbing is Hyper on Tokio.
//!
//! # Example
//!
//! ```no_run
//! use velo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), velo::ServeError> {
//!     let mut app = App::new(AppConfig::builder().http_addr("127.0.0.1:3000").build());
//!
//!     app.get("/hello/{name}", handler_fn(|_request, params| async move {
//!         Ok(format!("Hello {}!", params.get("name").unwrap_or("world")))
//!     }));
//!
//!     app.group(|api| {
//!         api.get("/status", handler_fn(|_request, _params| async { Ok("ok") }));
//!     })
//!     .prefix("/api");
//!
//!     app.run().await
//! }
//! ```

pub use velo_core::{
    handler_fn, scope, BoxFuture, CurrentRequest, Error, Handler, HandlerRef, IntoResponse,
    PathParams, Request, Response, ResponseExt, Result, Services,
};
pub use velo_middleware::{
    compose, FnMiddleware, Middleware, MiddlewareRef, MiddlewareRegistry, MiddlewareStack, Next,
};
pub use velo_routing::{
    fingerprint, DispatchCache, DispatchTable, FileDispatchCache, Matched, Methods, Route,
    RouteCollection, RouteEntry, TableEntry,
};
pub use velo_server::{
    App, AppConfig, AppConfigBuilder, HandlerRegistry, RequestMode, ServeError, Server,
    ServiceProvider, ShutdownSignal,
};

/// The most commonly used items, for glob import.
pub mod prelude {
    pub use velo_core::{
        handler_fn, scope, Error, HandlerRef, IntoResponse, PathParams, Request, Response,
        ResponseExt, Result,
    };
    pub use velo_middleware::{FnMiddleware, Middleware, MiddlewareRef, Next};
    pub use velo_routing::{Route, RouteCollection};
    pub use velo_server::{App, AppConfig, RequestMode, ServiceProvider};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request(path: &str) -> Request {
        let mut request = http::Request::new(Full::new(Bytes::new()));
        *request.uri_mut() = path.parse().expect("valid uri");
        request
    }

    #[tokio::test]
    async fn the_facade_wires_everything_together() {
        let mut app = App::new(AppConfig::default());
        app.get(
            "/hello/{name}",
            handler_fn(|_request, params| async move {
                Ok(format!("Hello {}!", params.get("name").unwrap_or("world")))
            }),
        );

        let response = app
            .handle(request("/hello/velo"), RequestMode::Main, true)
            .await
            .expect("handled");
        assert_eq!(response.status(), http::StatusCode::OK);
    }
}
