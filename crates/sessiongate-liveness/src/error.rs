//! Error types for the liveness layer.

use std::time::Duration;

/// A liveness signal didn't reach the presence service.
///
/// Never fatal: the reporter logs it and waits for the next tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LivenessError {
    /// The presence service couldn't be reached.
    #[error("presence service unreachable: {0}")]
    Unreachable(String),

    /// The presence service answered with an error.
    #[error("presence service rejected signal: {0}")]
    Rejected(String),

    /// The signal didn't complete within the configured emit timeout.
    #[error("liveness signal timed out after {0:?}")]
    Timeout(Duration),
}
