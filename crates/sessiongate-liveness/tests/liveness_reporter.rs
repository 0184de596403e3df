//! Integration tests for the liveness reporter.
//!
//! Uses `tokio::time::pause()` (via `start_paused`) so 30-second
//! intervals elapse instantly and deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sessiongate_liveness::{
    LivenessConfig, LivenessError, LivenessReporter, PresenceReporter,
};
use sessiongate_session::SessionStore;
use sessiongate_types::{AuthNotification, User, UserId};
use tokio::time::sleep;

// =========================================================================
// Mock presence service
// =========================================================================

/// Records every call; pops a scripted result per call (Ok when empty).
#[derive(Default)]
struct RecordingPresence {
    calls: Mutex<Vec<UserId>>,
    script: Mutex<VecDeque<Result<(), LivenessError>>>,
    hang: bool,
}

impl RecordingPresence {
    fn scripted(results: Vec<Result<(), LivenessError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            ..Default::default()
        })
    }

    fn hanging() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Default::default()
        })
    }

    fn calls(&self) -> Vec<UserId> {
        self.calls.lock().unwrap().clone()
    }
}

impl PresenceReporter for RecordingPresence {
    async fn report_liveness(&self, user_id: &UserId) -> Result<(), LivenessError> {
        let result = {
            self.calls.lock().unwrap().push(user_id.clone());
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
        };
        if self.hang {
            std::future::pending::<()>().await;
        }
        result
    }
}

// =========================================================================
// Helpers
// =========================================================================

const INTERVAL: Duration = Duration::from_secs(30);

fn config() -> LivenessConfig {
    LivenessConfig::with_interval(INTERVAL)
}

fn signed_in_store() -> SessionStore {
    let store = SessionStore::new();
    store
        .apply(AuthNotification::signed_in(User::new("u-1", "Alice")))
        .unwrap();
    store
}

fn u1() -> UserId {
    UserId::new("u-1")
}

// =========================================================================
// Ticking
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_three_ticks_three_signals_despite_failure() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![
        Ok(()),
        Err(LivenessError::Unreachable("offline".into())),
        Ok(()),
    ]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL * 3 + Duration::from_millis(1)).await;

    assert_eq!(presence.calls(), vec![u1(), u1(), u1()]);
    let m = reporter.metrics();
    assert_eq!(m.ticks, 3);
    assert_eq!(m.sent, 2);
    assert_eq!(m.failed, 1);
    assert!(reporter.is_running(), "a failure must not stop the timer");
}

#[tokio::test(start_paused = true)]
async fn test_no_signal_before_first_interval() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL - Duration::from_millis(1)).await;

    assert!(presence.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_signed_out_ticks_send_nothing_but_keep_running() {
    let store = SessionStore::new();
    store.apply(AuthNotification::signed_out()).unwrap();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL * 3 + Duration::from_millis(1)).await;
    assert!(presence.calls().is_empty());
    assert_eq!(reporter.metrics().skipped, 3);

    // Signing in mid-run is picked up on the next tick.
    store
        .apply(AuthNotification::signed_in(User::new("u-1", "Alice")))
        .unwrap();
    sleep(INTERVAL).await;
    assert_eq!(presence.calls(), vec![u1()]);
}

#[tokio::test(start_paused = true)]
async fn test_reports_current_user_after_switch() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL + Duration::from_millis(1)).await;
    store
        .apply(AuthNotification::signed_in(User::new("u-2", "Bob")))
        .unwrap();
    sleep(INTERVAL).await;

    assert_eq!(presence.calls(), vec![u1(), UserId::new("u-2")]);
}

#[tokio::test(start_paused = true)]
async fn test_hung_signal_times_out_and_next_tick_still_fires() {
    let store = signed_in_store();
    let presence = RecordingPresence::hanging();
    let cfg = LivenessConfig {
        emit_timeout_ms: 5_000,
        ..config()
    };
    let mut reporter =
        LivenessReporter::new(cfg, store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL * 2 + Duration::from_secs(6)).await;

    assert_eq!(presence.calls().len(), 2);
    assert_eq!(reporter.metrics().failed, 2);
}

// =========================================================================
// start / stop
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_then_ticks_emit_nothing() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    sleep(INTERVAL + Duration::from_millis(1)).await;
    reporter.stop();
    sleep(INTERVAL * 10).await;

    assert_eq!(presence.calls().len(), 1);
    assert!(!reporter.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_twice_is_harmless() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.stop();
    reporter.stop();
    reporter.start();
    reporter.stop();
    reporter.stop();
    sleep(INTERVAL * 3).await;

    assert!(presence.calls().is_empty());
    assert_eq!(reporter.metrics(), Default::default());
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_runs_one_timer() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    reporter.start();
    sleep(INTERVAL * 2 + Duration::from_millis(1)).await;

    assert_eq!(presence.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_resumes_reporting() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    reporter.stop();
    reporter.start();
    sleep(INTERVAL + Duration::from_millis(1)).await;

    assert_eq!(presence.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_timer() {
    let store = signed_in_store();
    let presence = RecordingPresence::scripted(vec![]);
    let mut reporter =
        LivenessReporter::new(config(), store.subscribe(), Arc::clone(&presence));

    reporter.start();
    drop(reporter);
    sleep(INTERVAL * 3).await;

    assert!(presence.calls().is_empty());
}
