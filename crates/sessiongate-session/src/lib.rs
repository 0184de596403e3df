//! Session state for SessionGate.
//!
//! This crate owns the one piece of shared mutable state in the system:
//! "who is signed in right now".
//!
//! 1. **Auth contract**: what we need from an auth provider
//!    ([`AuthProvider`] trait)
//! 2. **Session store**: the single authoritative snapshot
//!    ([`SessionStore`]), fed only by the provider's notifications
//! 3. **Change notification**: readers subscribe with a
//!    [`SessionWatcher`] instead of polling
//!
//! # How it fits in the stack
//!
//! ```text
//! Guard / Liveness (above)  ← watch the snapshot and react to changes
//!     ↕
//! Session Layer (this crate)  ← one writer, many readers
//!     ↕
//! Types (below)  ← SessionSnapshot, AuthNotification, User
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod store;

pub use auth::AuthProvider;
pub use error::{PasswordChangeError, SessionError};
pub use store::{SessionStore, SessionWatcher};
