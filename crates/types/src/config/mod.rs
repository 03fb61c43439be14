// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the block-commit core.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the durable state store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the redb database file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Number of historical chain state snapshots to keep below the latest height.
    /// Must cover `evidence.max_age` for evidence validation. Zero keeps everything.
    #[serde(default = "default_retain_heights")]
    pub retain_heights: u64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/state.redb")
}
fn default_retain_heights() -> u64 {
    0
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            retain_heights: default_retain_heights(),
        }
    }
}

/// Configuration for the in-process event bus.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Number of events buffered per subscriber before slow subscribers start lagging.
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

fn default_event_capacity() -> usize {
    1024
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

/// Configuration for logs and metrics.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Emit JSON logs instead of human-readable ones.
    #[serde(default = "default_json_logs")]
    pub json_logs: bool,
    /// Register the Prometheus metrics sink at startup.
    #[serde(default)]
    pub prometheus: bool,
}

fn default_json_logs() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logs: default_json_logs(),
            prometheus: false,
        }
    }
}

/// Top-level configuration of a block-commit core instance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CommitConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub event_bus: EventBusConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl CommitConfig {
    /// Parses a TOML configuration document. Missing sections take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
