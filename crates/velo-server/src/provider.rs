//! Service providers.
//!
//! A provider packages the wiring for one concern (a database pool, a
//! mailer, a set of routes) so applications can be assembled from parts.
//! Registration happens immediately when the provider is added; booting
//! happens once for all providers, just before the first request is
//! dispatched.

use crate::app::App;

/// A pluggable unit of application wiring.
pub trait ServiceProvider: Send + Sync {
    /// Registers services, routes, handlers or middleware on the app.
    ///
    /// Called synchronously by [`App::register`]. Providers must not use
    /// other providers' services here; that is what [`boot`] is for.
    ///
    /// [`boot`]: ServiceProvider::boot
    fn register(&self, app: &mut App);

    /// Runs once before the first request, after every provider has
    /// registered.
    fn boot(&self, app: &App) {
        let _ = app;
    }
}
