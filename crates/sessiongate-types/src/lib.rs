//! Shared vocabulary for SessionGate.
//!
//! Every other crate in the workspace speaks in these types:
//!
//! - **Identity** ([`UserId`], [`User`]): who is signed in.
//! - **Session status** ([`AuthStatus`], [`SessionSnapshot`],
//!   [`AuthNotification`]): what the auth provider last told us.
//! - **Navigation** ([`Route`], [`RouteGroup`]): where the user is and
//!   where the guard may send them.
//!
//! # Architecture
//!
//! ```text
//! Auth provider → AuthNotification → SessionSnapshot → RouteGuard / LivenessReporter
//! ```
//!
//! This crate has no runtime and no I/O. It only defines data and the
//! rules that keep that data consistent.

mod error;
mod types;

pub use error::TypesError;
pub use types::{
    AuthNotification, AuthStatus, Route, RouteGroup, SessionSnapshot, User,
    UserId,
};
