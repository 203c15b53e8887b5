//! Application configuration.
//!
//! # Example
//!
//! ```rust
//! use velo_server::AppConfig;
//! use std::time::Duration;
//!
//! let config = AppConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .debug(true)
//!     .shutdown_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert!(config.debug());
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default graceful-shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
///
/// Use [`AppConfig::builder()`] to construct instances.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Debug mode: richer error bodies, dispatch cache disabled.
    debug: bool,

    /// Where to persist the dispatch-table cache (None = no cache).
    route_cache_file: Option<PathBuf>,

    /// HTTP bind address (e.g., "0.0.0.0:8080").
    http_addr: String,

    /// How long to wait for in-flight requests during shutdown.
    shutdown_timeout: Duration,
}

impl AppConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Whether debug mode is on.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The dispatch-cache file path, if configured.
    #[must_use]
    pub fn route_cache_file(&self) -> Option<&Path> {
        self.route_cache_file.as_deref()
    }

    /// The HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the HTTP address into a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// The graceful-shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppConfigBuilder {
    debug: bool,
    route_cache_file: Option<PathBuf>,
    http_addr: String,
    shutdown_timeout: Duration,
}

impl AppConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            debug: false,
            route_cache_file: None,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Turns debug mode on or off.
    ///
    /// Debug mode enriches default error bodies with the failure message
    /// and disables the dispatch cache.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the dispatch-cache file path.
    #[must_use]
    pub fn route_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.route_cache_file = Some(path.into());
        self
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful-shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the [`AppConfig`].
    #[must_use]
    pub fn build(self) -> AppConfig {
        AppConfig {
            debug: self.debug,
            route_cache_file: self.route_cache_file,
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
