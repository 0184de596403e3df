//! Liveness reporting for SessionGate.
//!
//! While a user is signed in, a background task tells an external
//! presence service "this session is alive" on a steady cadence. Other
//! parts of the system (e.g. a caller deciding whether a user is
//! reachable) read presence as soft real-time state instead of needing a
//! push on every app event.
//!
//! # Behaviour per tick
//!
//! - signed in → one [`PresenceReporter::report_liveness`] call for the
//!   current user
//! - anything else → nothing is sent, the timer keeps running
//! - a failed or timed-out signal is logged and dropped; the next tick
//!   simply tries again
//!
//! # Integration
//!
//! ```ignore
//! let mut reporter = LivenessReporter::new(config, store.subscribe(), presence);
//! reporter.start();
//! // ...
//! reporter.stop(); // also runs on drop
//! ```

mod config;
mod error;
mod presence;
mod reporter;
mod ticker;

pub use config::LivenessConfig;
pub use error::LivenessError;
pub use presence::PresenceReporter;
pub use reporter::{LivenessMetrics, LivenessReporter};
pub use ticker::{TickInfo, Ticker};
