//! The contract SessionGate expects from an auth provider.
//!
//! SessionGate doesn't authenticate anyone. Firebase, Supabase, a custom
//! OAuth flow: whatever validates credentials lives behind the
//! [`AuthProvider`] trait. We only need two things from it:
//!
//! - a stream of state changes, so the [`SessionStore`](crate::SessionStore)
//!   can mirror them
//! - a way to change the signed-in user's password
//!
//! Transport retries are the provider's business. A notification that
//! reaches us is taken at face value.

use sessiongate_types::AuthNotification;
use tokio::sync::mpsc;

use crate::PasswordChangeError;

/// An external auth provider.
///
/// # Trait bounds
///
/// - `Send + Sync` → shared across tasks behind an `Arc`.
/// - `'static` → lives as long as the composition root that owns it.
///
/// # Example
///
/// ```rust
/// use sessiongate_session::{AuthProvider, PasswordChangeError};
/// use sessiongate_types::{AuthNotification, User};
/// use tokio::sync::mpsc;
///
/// /// Signs everyone in as the same user. Development only.
/// struct AlwaysSignedIn;
///
/// impl AuthProvider for AlwaysSignedIn {
///     fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthNotification> {
///         let (tx, rx) = mpsc::unbounded_channel();
///         let _ = tx.send(AuthNotification::signed_in(User::new("dev", "Dev")));
///         rx
///     }
///
///     async fn change_password(
///         &self,
///         _current: &str,
///         _new: &str,
///     ) -> Result<(), PasswordChangeError> {
///         Err(PasswordChangeError::Rejected("not supported".into()))
///     }
/// }
/// ```
pub trait AuthProvider: Send + Sync + 'static {
    /// Returns a channel that receives every auth state change, in the
    /// order the provider observed them.
    ///
    /// The provider should send its current state first if it already
    /// knows it (cached credentials), then each change after that.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthNotification>;

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    /// Returns [`PasswordChangeError::Rejected`] with a human-readable
    /// reason when the provider refuses the change.
    async fn change_password(
        &self,
        current: &str,
        new: &str,
    ) -> Result<(), PasswordChangeError>;
}
