//! Auth-gated route guard for SessionGate.
//!
//! Keeps the visible screen consistent with the session: signed-in users
//! don't linger on the sign-in screen, signed-out users don't linger in
//! the app. Redirects are debounced so the brief signed-out flicker some
//! auth providers emit while restoring cached credentials never reaches
//! the screen.
//!
//! # Key types
//!
//! - [`Navigator`]: the trait the host's navigation system implements
//! - [`RouteGuard`]: the redirect state machine (no I/O of its own)
//! - [`GuardHandle`]: talk to a running guard actor ([`spawn_guard`])
//! - [`GuardConfig`]: debounce delay and target routes

mod config;
mod error;
mod guard;
mod navigator;
mod task;

pub use config::GuardConfig;
pub use error::{GuardError, NavigationError};
pub use guard::{Decision, FireOutcome, GuardStats, PendingRedirect, RouteGuard};
pub use navigator::Navigator;
pub use task::{spawn_guard, GuardHandle, GuardInfo};
