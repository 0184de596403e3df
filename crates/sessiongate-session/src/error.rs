//! Error types for the session layer.

/// Errors that can occur while applying or observing session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The provider reported `Authenticated` without saying who.
    ///
    /// Treated as an auth error: the store falls back to `Unknown` so
    /// nothing downstream acts on a session it can't attribute.
    #[error("authenticated notification carried no user")]
    MissingUser,

    /// The session store was dropped; no further changes will arrive.
    #[error("session store closed")]
    Closed,
}

/// Why a password change didn't go through.
///
/// Returned as a value so the UI layer can show [`reason`](Self::reason)
/// to the user. Never a fatal fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordChangeError {
    /// The current or the new password was empty.
    #[error("all password fields are required")]
    MissingField,

    /// Nobody is signed in, so there is no password to change.
    #[error("you must be signed in to change your password")]
    NotAuthenticated,

    /// The auth provider refused the change. Carries its explanation
    /// (wrong current password, weak new password, network failure...).
    #[error("{0}")]
    Rejected(String),
}

impl PasswordChangeError {
    /// Human-readable explanation suitable for showing to the user.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
