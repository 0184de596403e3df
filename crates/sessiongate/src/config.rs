//! Top-level configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sessiongate_guard::GuardConfig;
use sessiongate_liveness::LivenessConfig;

use crate::SessionGateError;

/// Configuration for every SessionGate component.
///
/// Serialized as JSON with one section per component. Missing sections
/// and fields fall back to their defaults:
///
/// ```json
/// {
///   "guard": { "debounce_ms": 1000, "home_route": "/home", "sign_in_route": "/signIn" },
///   "liveness": { "interval_ms": 30000, "emit_timeout_ms": 10000 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionGateConfig {
    pub guard: GuardConfig,
    pub liveness: LivenessConfig,
}

impl SessionGateConfig {
    /// Parses a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, SessionGateError> {
        Ok(serde_json::from_str::<Self>(json)?.validated())
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionGateError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Clamps every section.
    pub fn validated(self) -> Self {
        Self {
            guard: self.guard.validated(),
            liveness: self.liveness.validated(),
        }
    }
}
