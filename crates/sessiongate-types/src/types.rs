//! Core data types for session gating.
//!
//! These are the values that flow between the auth provider, the session
//! store, the route guard, and the liveness reporter. All of them are
//! plain data: cheap to clone, comparable, and serializable so that
//! configuration files and logs can carry them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a user, as issued by the auth provider.
///
/// Newtype over `String` so a user id can't be confused with a display
/// name or an email address in function signatures.
///
/// `#[serde(transparent)]` serializes this as the bare string, so
/// `UserId("u-1")` becomes `"u-1"` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a user id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The identity record for a signed-in user.
///
/// Only the fields the gating core and the profile service care about.
/// Anything else the auth provider knows stays with the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued identifier. Liveness signals are keyed by this.
    pub id: UserId,
    /// Human-readable name shown in the UI.
    pub display_name: String,
    /// Email address, if the provider shares one.
    #[serde(default)]
    pub email: Option<String>,
    /// Public URL of the avatar image, if one was uploaded.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    /// Creates a user with no email and no avatar.
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
            avatar: None,
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the avatar reference.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

// ---------------------------------------------------------------------------
// AuthStatus
// ---------------------------------------------------------------------------

/// What the auth provider has told us about the current session.
///
/// ```text
///   Unknown ──(first notification)──→ Authenticated ⇄ Unauthenticated
///      ↑                                    │               │
///      └─────────(auth error / reset)───────┴───────────────┘
/// ```
///
/// `Unknown` is the boot state: the provider hasn't answered yet, so
/// nobody can say whether the user belongs in the app or on the
/// sign-in screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum AuthStatus {
    /// No answer from the auth provider yet.
    #[default]
    Unknown,
    /// A user is signed in.
    Authenticated,
    /// Nobody is signed in.
    Unauthenticated,
}

impl AuthStatus {
    /// `true` once the provider has given a definite answer.
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A consistent `(status, user)` pair.
///
/// The user lives *inside* the `Authenticated` variant, so a snapshot
/// with a user but no authentication (or the reverse) can't be built.
/// Readers always get both halves from the same moment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "user")]
pub enum SessionSnapshot {
    /// Boot state, or reset after an auth error.
    #[default]
    Unknown,
    /// Signed in as the carried user.
    Authenticated(User),
    /// Signed out.
    Unauthenticated,
}

impl SessionSnapshot {
    /// Builds a snapshot from the loose pair an auth provider reports.
    ///
    /// # Errors
    /// - [`TypesError::MissingUser`]: `Authenticated` without a user.
    /// - [`TypesError::UnexpectedUser`]: a user with any other status.
    pub fn from_parts(
        status: AuthStatus,
        user: Option<User>,
    ) -> Result<Self, TypesError> {
        match (status, user) {
            (AuthStatus::Authenticated, Some(user)) => {
                Ok(Self::Authenticated(user))
            }
            (AuthStatus::Authenticated, None) => Err(TypesError::MissingUser),
            (status, Some(_)) => Err(TypesError::UnexpectedUser(status)),
            (AuthStatus::Unknown, None) => Ok(Self::Unknown),
            (AuthStatus::Unauthenticated, None) => Ok(Self::Unauthenticated),
        }
    }

    /// The status half of the pair.
    pub fn status(&self) -> AuthStatus {
        match self {
            Self::Unknown => AuthStatus::Unknown,
            Self::Authenticated(_) => AuthStatus::Authenticated,
            Self::Unauthenticated => AuthStatus::Unauthenticated,
        }
    }

    /// The user half of the pair. `Some` iff authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Shorthand for `self.user().map(|u| &u.id)`.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(|u| &u.id)
    }

    /// `true` if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// One change report from the auth provider.
///
/// Kept as the loose pair the provider hands us; the session store turns
/// it into a [`SessionSnapshot`] and decides what to do with bad pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthNotification {
    pub status: AuthStatus,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthNotification {
    /// A sign-in (or token refresh) for `user`.
    pub fn signed_in(user: User) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            user: Some(user),
        }
    }

    /// A sign-out or session expiry.
    pub fn signed_out() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            user: None,
        }
    }

    /// The provider lost track of the session (e.g. a refresh error).
    pub fn unknown() -> Self {
        Self {
            status: AuthStatus::Unknown,
            user: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation types
// ---------------------------------------------------------------------------

/// Which section of the app a screen belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RouteGroup {
    /// Screens that require a signed-in user.
    App,
    /// Screens for signed-out users (sign-in, sign-up).
    Public,
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => f.write_str("app"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// An absolute route path such as `/home`.
///
/// Validated on construction: non-empty and starting with `/`.
/// Serialized as the bare path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route(String);

impl Route {
    /// Parses a route path.
    ///
    /// # Errors
    /// Returns [`TypesError::InvalidRoute`] if the path is empty or
    /// relative.
    pub fn parse(path: impl Into<String>) -> Result<Self, TypesError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(TypesError::InvalidRoute(path));
        }
        Ok(Self(path))
    }

    /// The landing screen for signed-in users.
    pub fn home() -> Self {
        Self("/home".to_string())
    }

    /// The sign-in screen.
    pub fn sign_in() -> Self {
        Self("/signIn".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Route {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Route {
    type Error = TypesError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Self::parse(path)
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.0
    }
}

// =========================================================================
// Tests
// =========================================================================
