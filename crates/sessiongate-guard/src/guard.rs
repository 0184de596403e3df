//! The redirect state machine.
//!
//! `RouteGuard` decides; it doesn't wait. Time comes in as an argument
//! and the one pending redirect sits in an explicit slot, so the whole
//! machine can be driven step by step in tests. The actor in
//! [`task`](crate::task) supplies the clock and the triggers.
//!
//! ```text
//!            mismatch (schedule / replace)
//!        ┌────────────────────────────────┐
//!        │                                ▼
//!     [Idle] ◄──(consistent: cancel)── [Pending(target, due)]
//!        ▲                                │
//!        └──────(due: re-check, then ─────┘
//!                navigate or skip)
//! ```

use std::sync::Arc;

use sessiongate_types::{AuthStatus, Route, RouteGroup};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::{GuardConfig, NavigationError, Navigator};

/// A scheduled redirect that hasn't fired yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    /// Where the user will be sent.
    pub target: Route,
    /// When the redirect is due.
    pub due: Instant,
}

/// What [`RouteGuard::evaluate`] did with a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Status is still `Unknown`; nothing can be classified yet.
    Deferred,
    /// Screen and session disagree. A redirect is now pending (any
    /// earlier one was replaced and its clock restarted).
    Scheduled(PendingRedirect),
    /// Screen and session agree; an earlier pending redirect was dropped.
    Cancelled,
    /// Screen and session agree and nothing was pending.
    Consistent,
}

/// What happened when a pending redirect came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The mismatch still held and the navigator accepted the redirect.
    Navigated(Route),
    /// The session or screen moved on during the debounce window.
    Stale,
    /// The navigator refused. Not retried.
    Failed(NavigationError),
    /// Nothing was pending.
    Idle,
}

/// Counters for everything the guard has done since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardStats {
    /// Redirects scheduled, including replacements.
    pub scheduled: u64,
    /// Scheduled redirects that replaced a still-pending one.
    pub replaced: u64,
    /// Pending redirects dropped because the mismatch resolved itself.
    pub cancelled: u64,
    /// Redirects handed to the navigator successfully.
    pub redirects: u64,
    /// Redirects skipped at fire time because the state had moved on.
    pub stale: u64,
    /// Redirects the navigator refused.
    pub failures: u64,
}

/// Debounced, session-aware redirect logic.
///
/// One guard per app. It owns at most one [`PendingRedirect`]; every
/// scheduling call replaces it (last write wins).
pub struct RouteGuard<N: Navigator> {
    config: GuardConfig,
    navigator: Arc<N>,
    pending: Option<PendingRedirect>,
    stats: GuardStats,
}

impl<N: Navigator> RouteGuard<N> {
    /// Creates an idle guard.
    pub fn new(config: GuardConfig, navigator: Arc<N>) -> Self {
        let config = config.validated();
        debug!(
            debounce_ms = config.debounce_ms,
            home = %config.home_route,
            sign_in = %config.sign_in_route,
            "route guard created"
        );
        Self {
            config,
            navigator,
            pending: None,
            stats: GuardStats::default(),
        }
    }

    /// Where the user should be sent right now, if anywhere.
    ///
    /// `None` when the status is `Unknown` or the active screen already
    /// matches the session.
    pub fn target_for(&self, status: AuthStatus) -> Option<Route> {
        let should_be_in_app = match status {
            AuthStatus::Unknown => return None,
            AuthStatus::Authenticated => true,
            AuthStatus::Unauthenticated => false,
        };
        let is_in_app = self.navigator.current_group() == RouteGroup::App;

        if should_be_in_app == is_in_app {
            return None;
        }
        Some(if should_be_in_app {
            self.config.home_route.clone()
        } else {
            self.config.sign_in_route.clone()
        })
    }

    /// Handles a trigger: a session change or an explicit re-evaluation.
    pub fn evaluate(&mut self, status: AuthStatus, now: Instant) -> Decision {
        if !status.is_settled() {
            trace!("session status unknown, deferring");
            return Decision::Deferred;
        }

        let Some(target) = self.target_for(status) else {
            return match self.pending.take() {
                Some(previous) => {
                    self.stats.cancelled += 1;
                    debug!(
                        target = %previous.target,
                        %status,
                        "mismatch resolved, pending redirect cancelled"
                    );
                    Decision::Cancelled
                }
                None => Decision::Consistent,
            };
        };

        let redirect = PendingRedirect {
            target,
            due: now + self.config.debounce(),
        };
        if let Some(previous) = self.pending.replace(redirect.clone()) {
            self.stats.replaced += 1;
            trace!(previous = %previous.target, "replacing pending redirect");
        }
        self.stats.scheduled += 1;
        debug!(
            target = %redirect.target,
            %status,
            debounce_ms = self.config.debounce_ms,
            "redirect scheduled"
        );

        Decision::Scheduled(redirect)
    }

    /// Fires the pending redirect, re-checking it against `status` (the
    /// latest session status) and the current screen first.
    ///
    /// The pending slot is always empty afterwards.
    pub fn fire(&mut self, status: AuthStatus) -> FireOutcome {
        let Some(pending) = self.pending.take() else {
            return FireOutcome::Idle;
        };

        match self.target_for(status) {
            Some(target) if target == pending.target => {
                match self.navigator.replace_route(&target) {
                    Ok(()) => {
                        self.stats.redirects += 1;
                        info!(route = %target, %status, "redirected");
                        FireOutcome::Navigated(target)
                    }
                    Err(e) => {
                        self.stats.failures += 1;
                        warn!(route = %target, error = %e, "redirect failed");
                        FireOutcome::Failed(e)
                    }
                }
            }
            _ => {
                self.stats.stale += 1;
                debug!(
                    target = %pending.target,
                    %status,
                    "pending redirect is stale, skipping"
                );
                FireOutcome::Stale
            }
        }
    }

    /// The redirect waiting to fire, if any.
    pub fn pending(&self) -> Option<&PendingRedirect> {
        self.pending.as_ref()
    }

    /// When the pending redirect is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn stats(&self) -> GuardStats {
        self.stats
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

// =========================================================================
// Tests
// =========================================================================
