//! Logging setup.
//!
//! SessionGate logs through `tracing`. Applications that already install
//! a subscriber don't need this module; the helpers here are for binaries
//! and demos that want sensible output with one call.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,sessiongate=debug";

/// Installs a formatted subscriber filtered by `RUST_LOG`
/// (falling back to [`DEFAULT_FILTER`]).
///
/// Returns `false` if a global subscriber was already set.
pub fn try_init() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Like [`try_init`], ignoring an already-installed subscriber.
pub fn init() {
    let _ = try_init();
}
