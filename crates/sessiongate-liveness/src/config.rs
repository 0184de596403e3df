//! Liveness reporter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Full configuration for the liveness reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Milliseconds between liveness ticks. Default: 30 000 (30 s).
    pub interval_ms: u64,
    /// How long a single signal may take before it's abandoned.
    /// Default: 10 000 ms. Never longer than the interval.
    pub emit_timeout_ms: u64,
    /// Random delay (0–max ms) added to the *first* tick only, so many
    /// clients started together don't report in lockstep. Default: 0.
    pub initial_jitter_ms: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            emit_timeout_ms: 10_000,
            initial_jitter_ms: 0,
        }
    }
}

impl LivenessConfig {
    /// Shortest supported interval.
    pub const MIN_INTERVAL_MS: u64 = 1_000;
    /// Longest supported interval.
    pub const MAX_INTERVAL_MS: u64 = 3_600_000;

    /// Create a config for a specific interval with default settings.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            ..Default::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by
    /// [`LivenessReporter::new`](crate::LivenessReporter::new). Rules:
    /// - `interval_ms` clamped to
    ///   [`MIN_INTERVAL_MS`](Self::MIN_INTERVAL_MS)..=[`MAX_INTERVAL_MS`](Self::MAX_INTERVAL_MS).
    /// - `emit_timeout_ms` of 0, or longer than the interval, becomes the
    ///   interval.
    /// - `initial_jitter_ms` capped to the interval.
    pub fn validated(mut self) -> Self {
        let clamped = self
            .interval_ms
            .clamp(Self::MIN_INTERVAL_MS, Self::MAX_INTERVAL_MS);
        if clamped != self.interval_ms {
            warn!(
                interval_ms = self.interval_ms,
                clamped, "liveness interval out of range, clamping"
            );
            self.interval_ms = clamped;
        }
        if self.emit_timeout_ms == 0 || self.emit_timeout_ms > self.interval_ms {
            self.emit_timeout_ms = self.interval_ms;
        }
        self.initial_jitter_ms = self.initial_jitter_ms.min(self.interval_ms);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn emit_timeout(&self) -> Duration {
        Duration::from_millis(self.emit_timeout_ms)
    }

    pub fn initial_jitter(&self) -> Duration {
        Duration::from_millis(self.initial_jitter_ms)
    }
}
