//! Core types for the Velo web framework.
//!
//! This crate defines the vocabulary shared by every other Velo crate:
//!
//! - [`Request`] and [`Response`] aliases over the `http` types with a
//!   [`Full<Bytes>`](http_body_util::Full) body
//! - the [`Error`] taxonomy and the [`Result`] alias
//! - the [`Handler`] trait, [`HandlerRef`] and the [`IntoResponse`]
//!   coercion applied to handler return values
//! - the task-local [`scope`] exposing the request currently being handled
//! - the typed [`Services`] registry used for explicit dependency wiring

pub mod error;
pub mod handler;
pub mod scope;
pub mod services;
pub mod types;

pub use error::{Error, Result};
pub use handler::{handler_fn, BoxFuture, Handler, HandlerRef, PathParams};
pub use scope::CurrentRequest;
pub use services::Services;
pub use types::{IntoResponse, Request, Response, ResponseExt};
