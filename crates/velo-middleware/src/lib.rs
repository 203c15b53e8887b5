//! Middleware for the Velo web framework.
//!
//! A middleware wraps the handling of a request: it receives the request
//! and a [`Next`] continuation, and decides whether and when to run the
//! rest of the chain. Chains are composed with [`compose`], a
//! right-to-left fold that makes the last middleware in the list the
//! outermost wrapper.
//!
//! # Example
//!
//! ```
//! use velo_middleware::{FnMiddleware, Next};
//! use velo_core::Request;
//!
//! let timing = FnMiddleware::new("timing", |request: Request, next: Next| async move {
//!     let started = std::time::Instant::now();
//!     let response = next.run(request).await;
//!     tracing::debug!(elapsed = ?started.elapsed(), "request finished");
//!     response
//! });
//! ```

pub mod chain;
pub mod middleware;
pub mod registry;

pub use chain::compose;
pub use middleware::{FnMiddleware, Middleware, Next};
pub use registry::{MiddlewareRef, MiddlewareRegistry, MiddlewareStack};
