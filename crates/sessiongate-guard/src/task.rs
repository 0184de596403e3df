//! Guard actor: runs a [`RouteGuard`] inside its own Tokio task.
//!
//! The actor waits on three things at once:
//!
//! - the session watcher (every snapshot change is a trigger)
//! - its command channel (route changes, info requests, shutdown)
//! - the pending redirect's deadline (pends forever when idle)
//!
//! Everything runs on one task, so a trigger and a fire can never
//! interleave: the fire handler reads the latest session status once and
//! acts on exactly that.

use std::time::Duration;

use sessiongate_session::SessionWatcher;
use sessiongate_types::{AuthStatus, SessionSnapshot, UserId};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info, trace};

use crate::{GuardError, GuardStats, Navigator, PendingRedirect, RouteGuard};

/// Command channel size for the guard actor.
const CHANNEL_SIZE: usize = 32;

/// Commands sent to the guard actor.
enum GuardCommand {
    /// The active screen changed; re-check it against the session.
    Reevaluate,
    /// Report the pending redirect and counters.
    Info { reply: oneshot::Sender<GuardInfo> },
    /// Stop the actor. Any pending redirect is dropped.
    Shutdown,
}

/// A snapshot of the guard's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardInfo {
    /// The redirect waiting to fire, if any.
    pub pending: Option<PendingRedirect>,
    /// Counters since the guard started.
    pub stats: GuardStats,
    /// The configured debounce window.
    pub debounce: Duration,
}

/// Handle to a running guard actor.
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Clone)]
pub struct GuardHandle {
    sender: mpsc::Sender<GuardCommand>,
}

impl GuardHandle {
    /// Tells the guard the active screen changed.
    ///
    /// Counts as a trigger: restarts the debounce clock if a mismatch is
    /// found, cancels the pending redirect if not.
    pub async fn reevaluate(&self) -> Result<(), GuardError> {
        self.sender
            .send(GuardCommand::Reevaluate)
            .await
            .map_err(|_| GuardError::Unavailable)
    }

    /// Returns the guard's current state.
    pub async fn info(&self) -> Result<GuardInfo, GuardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(GuardCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| GuardError::Unavailable)?;
        reply_rx.await.map_err(|_| GuardError::Unavailable)
    }

    /// Stops the guard. Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(GuardCommand::Shutdown).await;
    }

    /// `true` once the actor has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

struct GuardActor<N: Navigator> {
    guard: RouteGuard<N>,
    session: SessionWatcher,
    receiver: mpsc::Receiver<GuardCommand>,
    /// Identity of the snapshot last evaluated. In-place edits of the
    /// user record keep it and are not triggers.
    last_seen: (AuthStatus, Option<UserId>),
}

impl<N: Navigator> GuardActor<N> {
    async fn run(mut self) {
        info!("route guard started");

        // The watcher marks the snapshot it was created with as seen, so
        // the starting state needs an explicit look.
        let initial = self.session.current();
        self.last_seen = identity(&initial);
        self.guard.evaluate(initial.status(), Instant::now());

        loop {
            let deadline = self.guard.deadline();

            tokio::select! {
                changed = self.session.changed() => match changed {
                    Ok(snapshot) => self.on_session_changed(&snapshot),
                    Err(_) => {
                        debug!("session store closed");
                        break;
                    }
                },
                cmd = self.receiver.recv() => match cmd {
                    Some(GuardCommand::Reevaluate) => {
                        self.guard.evaluate(self.session.status(), Instant::now());
                    }
                    Some(GuardCommand::Info { reply }) => {
                        let _ = reply.send(self.info());
                    }
                    Some(GuardCommand::Shutdown) | None => break,
                },
                () = wait_until(deadline) => {
                    // Read the latest status once, at fire time.
                    self.guard.fire(self.session.status());
                }
            }
        }

        info!(stats = ?self.guard.stats(), "route guard stopped");
    }

    fn on_session_changed(&mut self, snapshot: &SessionSnapshot) {
        let seen = identity(snapshot);
        if seen == self.last_seen {
            trace!(status = %seen.0, "user record edited, not a trigger");
            return;
        }
        self.last_seen = seen;
        self.guard.evaluate(snapshot.status(), Instant::now());
    }

    fn info(&self) -> GuardInfo {
        GuardInfo {
            pending: self.guard.pending().cloned(),
            stats: self.guard.stats(),
            debounce: self.guard.config().debounce(),
        }
    }
}

fn identity(snapshot: &SessionSnapshot) -> (AuthStatus, Option<UserId>) {
    (snapshot.status(), snapshot.user_id().cloned())
}

/// Sleeps until `deadline`, or forever when there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Spawns a guard actor driven by `session` and returns a handle to it.
///
/// The actor stops on [`GuardHandle::shutdown`], when every handle is
/// dropped, or when the session store goes away.
pub fn spawn_guard<N: Navigator>(
    guard: RouteGuard<N>,
    session: SessionWatcher,
) -> GuardHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = GuardActor {
        guard,
        session,
        receiver: rx,
        last_seen: (AuthStatus::Unknown, None),
    };
    tokio::spawn(actor.run());

    GuardHandle { sender: tx }
}
