//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable engine settings.
///
/// Model constants the scoring contract fixes (hybrid blend weights, the
/// similar-user threshold and cap) are *not* configurable; they live as
/// consts next to the code that uses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed result count for realtime recommendations.
    pub realtime_count: usize,
    /// Delay before the first scheduled retrain cycle.
    pub retrain_startup_delay_secs: u64,
    /// Interval between scheduled retrain cycles.
    pub retrain_interval_secs: u64,
    /// Interaction-history retention: keep only the newest N events at
    /// build/retrain time. `None` retains everything.
    pub max_interactions: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            realtime_count: 5,
            retrain_startup_delay_secs: 5 * 60,
            retrain_interval_secs: 60 * 60,
            max_interactions: None,
        }
    }
}

impl EngineConfig {
    /// Load settings from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Startup delay as a [`Duration`].
    pub fn retrain_startup_delay(&self) -> Duration {
        Duration::from_secs(self.retrain_startup_delay_secs)
    }

    /// Retrain interval as a [`Duration`].
    pub fn retrain_interval(&self) -> Duration {
        Duration::from_secs(self.retrain_interval_secs)
    }
}
