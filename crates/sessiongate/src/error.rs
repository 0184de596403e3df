//! Unified error type for the SessionGate meta-crate.

use sessiongate_guard::{GuardError, NavigationError};
use sessiongate_liveness::LivenessError;
use sessiongate_session::{PasswordChangeError, SessionError};
use sessiongate_types::TypesError;

use crate::ProfileError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `sessiongate` meta-crate you deal with this single
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SessionGateError {
    /// A value broke a data-model rule (bad route, inconsistent pair).
    #[error(transparent)]
    Types(#[from] TypesError),

    /// The session store rejected a notification or has closed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The guard actor is not running.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The navigation system refused a redirect.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// A liveness signal failed.
    #[error(transparent)]
    Liveness(#[from] LivenessError),

    /// A profile update failed.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// A password change was refused.
    #[error(transparent)]
    PasswordChange(#[from] PasswordChangeError),

    /// The configuration file couldn't be read.
    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file isn't valid JSON for [`SessionGateConfig`](crate::SessionGateConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessiongate_types::Route;

    #[test]
    fn test_from_session_error() {
        let err: SessionGateError = SessionError::MissingUser.into();
        assert!(matches!(err, SessionGateError::Session(_)));
        assert!(err.to_string().contains("no user"));
    }

    #[test]
    fn test_from_navigation_error() {
        let err: SessionGateError =
            NavigationError::Unreachable(Route::home()).into();
        assert!(matches!(err, SessionGateError::Navigation(_)));
        assert!(err.to_string().contains("/home"));
    }

    #[test]
    fn test_from_password_change_error_keeps_reason() {
        let err: SessionGateError =
            PasswordChangeError::Rejected("too short".into()).into();
        assert_eq!(err.to_string(), "too short");
    }

    #[test]
    fn test_from_profile_error() {
        let err: SessionGateError = ProfileError::EmptyUsername.into();
        assert!(matches!(err, SessionGateError::Profile(_)));
    }

    #[test]
    fn test_from_config_parse_error() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SessionGateError = parse.into();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
