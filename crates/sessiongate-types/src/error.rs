//! Error types for the shared vocabulary.

use crate::AuthStatus;

/// Errors raised when a value would break one of the data-model rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// An `Authenticated` status arrived without a user record.
    ///
    /// The snapshot can't represent this: an authenticated session
    /// always knows who it belongs to.
    #[error("authenticated status requires a user")]
    MissingUser,

    /// A user record arrived alongside a status that can't carry one.
    #[error("status {0} cannot carry a user")]
    UnexpectedUser(AuthStatus),

    /// A route path was empty or did not start with `/`.
    #[error("invalid route {0:?}: must be a non-empty absolute path")]
    InvalidRoute(String),
}
