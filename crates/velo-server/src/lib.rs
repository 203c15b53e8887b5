//! The Velo application kernel and HTTP server.
//!
//! [`App`] is the assembly point: routes, handlers, middleware, services
//! and providers are registered on it, and [`App::handle`] dispatches one
//! request. [`App::run`] serves the application with Hyper until a
//! shutdown signal arrives.
//!
//! # Example
//!
//! ```
//! use velo_server::{App, AppConfig, RequestMode};
//! use velo_core::handler_fn;
//!
//! # async fn example() -> velo_core::Result<()> {
//! let mut app = App::new(AppConfig::default());
//! app.get("/hello/{name}", handler_fn(|_request, params| async move {
//!     Ok(format!("hello {}", params.get("name").unwrap_or("world")))
//! }));
//!
//! let request = http::Request::builder()
//!     .uri("/hello/velo")
//!     .body(http_body_util::Full::new(bytes::Bytes::new()))
//!     .expect("valid request");
//! let response = app.handle(request, RequestMode::Main, true).await?;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod handlers;
pub mod provider;
pub mod server;
pub mod shutdown;

pub use app::{App, RequestMode};
pub use config::{AppConfig, AppConfigBuilder};
pub use handlers::HandlerRegistry;
pub use provider::ServiceProvider;
pub use server::{ServeError, Server};
pub use shutdown::ShutdownSignal;
