//! Error types for the guard layer.

use sessiongate_types::Route;

/// The navigation system couldn't perform a redirect.
///
/// Fatal to that one redirect attempt only. The guard logs it and goes
/// back to idle; the next session change re-evaluates naturally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The target route isn't registered or can't be reached right now.
    #[error("route {0} is unreachable")]
    Unreachable(Route),

    /// The navigation system refused for some other reason.
    #[error("navigation failed: {0}")]
    Failed(String),
}

/// Errors from talking to a guard actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// The guard actor has stopped (shutdown, or its session store
    /// went away).
    #[error("route guard is not running")]
    Unavailable,
}
