//! Guard configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sessiongate_types::Route;
use tracing::warn;

/// Configuration for the route guard.
///
/// `#[serde(default)]` lets a config file name only the fields it wants
/// to change; everything else keeps the value from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// How long (in milliseconds) a mismatch must persist before the
    /// guard redirects. Every new trigger restarts this window.
    ///
    /// Default: 1000 ms.
    pub debounce_ms: u64,

    /// Where signed-in users are sent when they land on a public screen.
    pub home_route: Route,

    /// Where signed-out users are sent when they land on an app screen.
    pub sign_in_route: Route,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1_000,
            home_route: Route::home(),
            sign_in_route: Route::sign_in(),
        }
    }
}

impl GuardConfig {
    /// Upper bound on the debounce window. Anything longer reads as a
    /// hang rather than flicker suppression.
    pub const MAX_DEBOUNCE_MS: u64 = 60_000;

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`RouteGuard::new`](crate::RouteGuard::new).
    pub fn validated(mut self) -> Self {
        if self.debounce_ms > Self::MAX_DEBOUNCE_MS {
            warn!(
                debounce_ms = self.debounce_ms,
                max = Self::MAX_DEBOUNCE_MS,
                "debounce_ms exceeds maximum, clamping"
            );
            self.debounce_ms = Self::MAX_DEBOUNCE_MS;
        }
        if self.home_route == self.sign_in_route {
            warn!(
                route = %self.home_route,
                "home and sign-in routes are identical, redirects will loop"
            );
        }
        self
    }

    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
