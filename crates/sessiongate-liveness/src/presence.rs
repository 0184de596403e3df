//! The contract SessionGate expects from a presence service.

use std::future::Future;

use sessiongate_types::UserId;

use crate::LivenessError;

/// An external presence/availability service.
///
/// Calls are best-effort and idempotent from our side: sending the same
/// signal twice is harmless, and a lost one is covered by the next tick.
///
/// The returned future must be `Send` because the reporter awaits it
/// from its own spawned task. Implementations can still be written as
/// `async fn`.
pub trait PresenceReporter: Send + Sync + 'static {
    /// Records that `user_id` has an active session right now.
    fn report_liveness(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), LivenessError>> + Send;
}
