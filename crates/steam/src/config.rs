//! Discovery configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings that steer where discovery looks for Steam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Explicit Steam root. When set, it is the only path tried.
    #[serde(default)]
    pub steam_path: Option<PathBuf>,

    /// Extra candidate roots, tried after the platform defaults.
    #[serde(default)]
    pub extra_search_paths: Vec<PathBuf>,

    /// Upper bound for the Windows registry query, in milliseconds.
    #[serde(default = "default_registry_timeout_ms")]
    pub registry_timeout_ms: u64,
}

fn default_registry_timeout_ms() -> u64 {
    5_000
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            steam_path: None,
            extra_search_paths: Vec::new(),
            registry_timeout_ms: default_registry_timeout_ms(),
        }
    }
}

impl DiscoveryConfig {
    pub fn registry_timeout(&self) -> Duration {
        Duration::from_millis(self.registry_timeout_ms)
    }
}
