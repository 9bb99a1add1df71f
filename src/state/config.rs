//! Engine configuration.

use serde::{Deserialize, Serialize};

use super::placer::DEFAULT_PLACEMENT_ATTEMPTS;

/// Tunables for a [`MazeGame`](super::MazeGame).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Random draws per collectible before it is skipped
    pub placement_attempts: u32,

    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
