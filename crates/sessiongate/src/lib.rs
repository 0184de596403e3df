//! # SessionGate
//!
//! Session-gated route authorization for client applications.
//!
//! SessionGate keeps three things in step with an external auth provider:
//!
//! - the **session** ([`SessionStore`]): who is signed in right now
//! - the **screen** ([`RouteGuard`]): signed-in users end up in the app,
//!   signed-out users on the sign-in screen, with a debounce that swallows
//!   the auth flicker of a cold start
//! - **presence** ([`LivenessReporter`]): a steady "still here" signal
//!   while someone is signed in
//!
//! It also carries the small profile operations that only make sense
//! against the current session ([`ProfileService`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sessiongate::prelude::*;
//!
//! // Implement AuthProvider, Navigator and PresenceReporter for your
//! // platform, then, inside a Tokio runtime:
//! // let gate = SessionGate::builder()
//! //     .config(SessionGateConfig::default())
//! //     .start(auth, navigator, presence);
//! // ...
//! // gate.shutdown().await;
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod gate;
mod profile;
pub mod telemetry;

pub use config::SessionGateConfig;
pub use error::SessionGateError;
pub use gate::{SessionGate, SessionGateBuilder};
pub use profile::{
    MediaStore, MediaUpload, ProfileApi, ProfileError, ProfileService,
    ProfileUpdate,
};

pub use sessiongate_guard::{
    GuardConfig, GuardHandle, GuardInfo, NavigationError, Navigator,
    RouteGuard,
};
pub use sessiongate_liveness::{
    LivenessConfig, LivenessError, LivenessMetrics, LivenessReporter,
    PresenceReporter,
};
pub use sessiongate_session::{
    AuthProvider, PasswordChangeError, SessionError, SessionStore,
    SessionWatcher,
};
pub use sessiongate_types::{
    AuthNotification, AuthStatus, Route, RouteGroup, SessionSnapshot, User,
    UserId,
};

/// Everything an integrator usually needs, in one import.
pub mod prelude {
    pub use crate::{
        AuthNotification, AuthProvider, AuthStatus, LivenessError, MediaStore,
        MediaUpload, NavigationError, Navigator, PasswordChangeError,
        PresenceReporter, ProfileApi, ProfileError, ProfileUpdate, Route,
        RouteGroup, SessionGate, SessionGateConfig, SessionGateError,
        SessionSnapshot, User, UserId,
    };
}
