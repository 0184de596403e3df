//! The session store: the single source of truth for "who is signed in".
//!
//! # Concurrency note
//!
//! The snapshot lives in a `tokio::sync::watch` channel. A send swaps the
//! whole [`SessionSnapshot`] in one step, so a reader sees either the old
//! `(status, user)` pair or the new one, never half of each. Reads take a
//! short read lock and never suspend.
//!
//! Watch channels keep only the latest value. A subscriber that falls
//! behind may skip intermediate snapshots; it always wakes up to the
//! newest one. Everything downstream decides on the latest snapshot, so
//! a skipped intermediate state never changes an outcome.

use std::sync::Arc;

use sessiongate_types::{
    AuthNotification, AuthStatus, SessionSnapshot, TypesError, User, UserId,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::SessionError;

/// Process-wide session state, owned by the composition root.
///
/// Cheap to clone: every clone shares the same underlying channel. Hand
/// clones to whatever needs to read; only the auth notification pump
/// (and the profile service, for in-place user edits) should write.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [Unknown] ──(notification)──→ [Authenticated(user)] ⇄ [Unauthenticated]
///               ↑                                   │                    │
///               └──────────(reset / bad pair)───────┴────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionStore {
    /// Creates a store in the `Unknown` boot state.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionSnapshot::Unknown);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Applies one change report from the auth provider.
    ///
    /// Replaces the snapshot atomically. A user attached to a
    /// non-authenticated status is dropped with a warning.
    ///
    /// # Errors
    /// Returns [`SessionError::MissingUser`] if `status` is
    /// `Authenticated` but `user` is `None`. The store resets to
    /// `Unknown` in that case.
    pub fn on_auth_notification(
        &self,
        status: AuthStatus,
        user: Option<User>,
    ) -> Result<(), SessionError> {
        let snapshot = match SessionSnapshot::from_parts(status, user) {
            Ok(snapshot) => snapshot,
            Err(TypesError::MissingUser) => {
                warn!("authenticated notification without a user, resetting session");
                self.replace(SessionSnapshot::Unknown);
                return Err(SessionError::MissingUser);
            }
            Err(_) => {
                warn!(%status, "dropping user attached to non-authenticated notification");
                SessionSnapshot::from_parts(status, None).unwrap_or_default()
            }
        };

        self.replace(snapshot);
        Ok(())
    }

    /// Same as [`on_auth_notification`](Self::on_auth_notification), taking
    /// the notification struct the provider's channel carries.
    pub fn apply(
        &self,
        notification: AuthNotification,
    ) -> Result<(), SessionError> {
        self.on_auth_notification(notification.status, notification.user)
    }

    /// Returns the current snapshot. Never blocks on I/O, never suspends.
    pub fn read(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    /// Returns just the current status.
    pub fn status(&self) -> AuthStatus {
        self.sender.borrow().status()
    }

    /// Registers a new observer. The watcher starts with the current
    /// snapshot marked as seen.
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            receiver: self.sender.subscribe(),
        }
    }

    /// Returns to the `Unknown` state (auth error or teardown).
    pub fn reset(&self) {
        self.replace(SessionSnapshot::Unknown);
    }

    /// Edits the signed-in user's record in place.
    ///
    /// Only applies while `user_id` is still the authenticated user, so a
    /// slow profile update can't write into someone else's session.
    /// Observers are notified only if the record actually changed.
    ///
    /// Returns `true` if the snapshot was modified.
    pub fn update_user(
        &self,
        user_id: &UserId,
        edit: impl FnOnce(&mut User),
    ) -> bool {
        let modified = self.sender.send_if_modified(|snapshot| match snapshot {
            SessionSnapshot::Authenticated(user) if &user.id == user_id => {
                let before = user.clone();
                edit(user);
                *user != before
            }
            _ => false,
        });

        if modified {
            debug!(%user_id, "session user record updated");
        }
        modified
    }

    /// Spawns the pump that feeds provider notifications into this store,
    /// in the order they were sent.
    ///
    /// The task ends when the provider drops its sender.
    pub fn follow(
        &self,
        mut notifications: mpsc::UnboundedReceiver<AuthNotification>,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            while let Some(notification) = notifications.recv().await {
                if let Err(e) = store.apply(notification) {
                    warn!(error = %e, "auth notification rejected");
                }
            }
            debug!("auth notification stream ended");
        })
    }

    /// Stores `next`, notifying observers only if it differs from the
    /// current snapshot.
    fn replace(&self, next: SessionSnapshot) {
        let mut previous = None;
        self.sender.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            previous = Some(std::mem::replace(current, next.clone()));
            true
        });

        let Some(previous) = previous else {
            return;
        };

        if previous.status() != next.status() {
            info!(
                from = %previous.status(),
                to = %next.status(),
                user_id = next.user_id().map(|id| id.as_str()),
                "session status changed"
            );
        } else {
            debug!(
                status = %next.status(),
                user_id = next.user_id().map(|id| id.as_str()),
                "session user changed"
            );
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only view of the session that can wait for changes.
///
/// Each watcher tracks which snapshot it last saw, so
/// [`changed`](Self::changed) only resolves for snapshots it hasn't
/// observed yet.
#[derive(Debug, Clone)]
pub struct SessionWatcher {
    receiver: watch::Receiver<SessionSnapshot>,
}

impl SessionWatcher {
    /// Returns the latest snapshot without marking it as seen.
    pub fn current(&self) -> SessionSnapshot {
        self.receiver.borrow().clone()
    }

    /// Returns the latest status.
    pub fn status(&self) -> AuthStatus {
        self.receiver.borrow().status()
    }

    /// Waits for the next unseen snapshot and returns it.
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] once every [`SessionStore`] clone
    /// has been dropped.
    pub async fn changed(&mut self) -> Result<SessionSnapshot, SessionError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

// =========================================================================
// Tests
// =========================================================================
