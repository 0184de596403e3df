//! The contract SessionGate expects from the host's navigation system.

use sessiongate_types::{Route, RouteGroup};

use crate::NavigationError;

/// The host application's router, as seen by the guard.
///
/// Both methods are synchronous: `current_group` is a cheap lookup and
/// `replace_route` only has to *start* the navigation. The guard never
/// waits for a screen transition to finish.
pub trait Navigator: Send + Sync + 'static {
    /// Which section the active screen belongs to.
    fn current_group(&self) -> RouteGroup;

    /// Replaces the current screen with `route` (no back-stack entry).
    ///
    /// # Errors
    /// Returns a [`NavigationError`] if the route can't be shown.
    fn replace_route(&self, route: &Route) -> Result<(), NavigationError>;
}
