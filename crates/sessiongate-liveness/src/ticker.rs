//! Fixed-period ticker.
//!
//! A stripped-down fixed-timestep scheduler: one tick per period, first
//! tick one period (plus optional jitter) after creation. When a tick is
//! picked up late by more than a whole period, the missed ticks are
//! skipped rather than fired in a burst; a presence service gains nothing
//! from three back-to-back "still here" signals.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{trace, warn};

/// Information about a fired tick, returned by [`Ticker::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// How far behind schedule the tick was picked up.
    pub late_by: Duration,
    /// How many whole periods were skipped (0 in normal operation).
    pub ticks_skipped: u64,
}

/// Fixed-period tick source.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    /// When the next tick should fire.
    next: Instant,
    tick_count: u64,
}

impl Ticker {
    /// Creates a ticker whose first tick fires after `period` plus a
    /// random delay in `0..=max_jitter`.
    pub fn new(period: Duration, max_jitter: Duration) -> Self {
        let jitter = if max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let max_ms = u64::try_from(max_jitter.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(rand::rng().random_range(0..=max_ms))
        };

        Self {
            period,
            next: Instant::now() + period + jitter,
            tick_count: 0,
        }
    }

    /// Waits until the next tick is due and returns its [`TickInfo`].
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        time::sleep_until(self.next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(self.next);
        let ticks_skipped =
            u64::try_from(late_by.as_nanos() / self.period.as_nanos().max(1))
                .unwrap_or(u64::MAX);

        self.next = if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "liveness tick overrun, skipping ahead"
            );
            now + self.period
        } else {
            self.next + self.period
        };

        trace!(tick = self.tick_count, "liveness tick");

        TickInfo {
            tick: self.tick_count,
            late_by,
            ticks_skipped,
        }
    }

    /// When the next tick is due.
    pub fn next_tick(&self) -> Instant {
        self.next
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
