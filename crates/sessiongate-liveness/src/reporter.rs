//! The liveness reporter: a start/stop-able background heartbeat.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sessiongate_session::SessionWatcher;
use sessiongate_types::UserId;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, trace, warn};

use crate::{LivenessConfig, LivenessError, PresenceReporter, Ticker};

/// Counters for a reporter, across every start/stop cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivenessMetrics {
    /// Ticks that fired.
    pub ticks: u64,
    /// Signals the presence service accepted.
    pub sent: u64,
    /// Signals that failed or timed out (logged and dropped).
    pub failed: u64,
    /// Ticks that sent nothing because nobody was signed in.
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> LivenessMetrics {
        LivenessMetrics {
            ticks: self.ticks.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Periodically tells a [`PresenceReporter`] that the signed-in user is
/// still here.
///
/// Reads the session through a [`SessionWatcher`] at each tick, so it
/// always reports the user who is signed in *now*. Dropping the reporter
/// stops its timer.
pub struct LivenessReporter<P: PresenceReporter> {
    config: LivenessConfig,
    session: SessionWatcher,
    presence: Arc<P>,
    counters: Arc<Counters>,
    task: Option<JoinHandle<()>>,
}

impl<P: PresenceReporter> LivenessReporter<P> {
    /// Creates a stopped reporter.
    pub fn new(
        config: LivenessConfig,
        session: SessionWatcher,
        presence: Arc<P>,
    ) -> Self {
        let config = config.validated();
        debug!(
            interval_ms = config.interval_ms,
            emit_timeout_ms = config.emit_timeout_ms,
            "liveness reporter created"
        );
        Self {
            config,
            session,
            presence,
            counters: Arc::new(Counters::default()),
            task: None,
        }
    }

    /// Starts the periodic timer. Does nothing if already running.
    ///
    /// The first tick fires one interval (plus configured jitter) from
    /// now. Must be called from inside a Tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            trace!("liveness reporter already running");
            return;
        }

        let ticker = Ticker::new(self.config.interval(), self.config.initial_jitter());
        let session = self.session.clone();
        let presence = Arc::clone(&self.presence);
        let counters = Arc::clone(&self.counters);
        let emit_timeout = self.config.emit_timeout();

        self.task = Some(tokio::spawn(run(
            ticker,
            session,
            presence,
            counters,
            emit_timeout,
        )));
        info!(interval_ms = self.config.interval_ms, "liveness reporter started");
    }

    /// Cancels the timer. Idempotent; safe to call before `start`.
    ///
    /// A signal that is in flight when `stop` is called is abandoned.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("liveness reporter stopped");
        }
    }

    /// `true` between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Snapshot of the counters.
    pub fn metrics(&self) -> LivenessMetrics {
        self.counters.snapshot()
    }

    pub fn config(&self) -> &LivenessConfig {
        &self.config
    }
}

impl<P: PresenceReporter> Drop for LivenessReporter<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The timer loop. Runs until aborted.
async fn run<P: PresenceReporter>(
    mut ticker: Ticker,
    session: SessionWatcher,
    presence: Arc<P>,
    counters: Arc<Counters>,
    emit_timeout: std::time::Duration,
) {
    loop {
        let tick = ticker.wait_for_tick().await;
        counters.ticks.fetch_add(1, Ordering::Relaxed);

        let Some(user_id) = session.current().user_id().cloned() else {
            counters.skipped.fetch_add(1, Ordering::Relaxed);
            trace!(tick = tick.tick, "not signed in, no liveness signal");
            continue;
        };

        match emit(presence.as_ref(), &user_id, emit_timeout).await {
            Ok(()) => {
                counters.sent.fetch_add(1, Ordering::Relaxed);
                trace!(tick = tick.tick, %user_id, "liveness signal sent");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(tick = tick.tick, %user_id, error = %e, "liveness signal dropped");
            }
        }
    }
}

/// Sends one signal, bounded by `emit_timeout`.
async fn emit<P: PresenceReporter>(
    presence: &P,
    user_id: &UserId,
    emit_timeout: std::time::Duration,
) -> Result<(), LivenessError> {
    time::timeout(emit_timeout, presence.report_liveness(user_id))
        .await
        .map_err(|_| LivenessError::Timeout(emit_timeout))?
}
