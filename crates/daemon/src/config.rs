// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: a TOML file with `LLMFABRIC_*` environment-variable
//! overrides layered on top of built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use llmfabric_engine::ReconcileMode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid LLMFABRIC_RECONCILE_MODE value {0:?}, expected \"global\" or \"pool\"")]
    InvalidReconcileMode(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_interval: Duration,
    pub download_poll_interval: Duration,
    pub reaper_interval: Duration,
    pub probe_timeout: Duration,
    pub circuit_failure_threshold: u32,
    pub circuit_reset_after: Duration,
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_interval: Duration,
    pub default_policy: String,
    pub reconcile_mode: ReconcileMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            download_poll_interval: Duration::from_millis(500),
            reaper_interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            circuit_failure_threshold: 5,
            circuit_reset_after: Duration::from_secs(30),
            snapshot_path: None,
            snapshot_interval: Duration::from_secs(30),
            default_policy: "auto".to_string(),
            reconcile_mode: ReconcileMode::Global,
        }
    }
}

/// Mirrors `Config` but with every field optional, for TOML deserialization.
/// Absent fields fall back to `Config::default()`, then to env overrides.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    tick_interval_ms: Option<u64>,
    download_poll_interval_ms: Option<u64>,
    reaper_interval_ms: Option<u64>,
    probe_timeout_ms: Option<u64>,
    circuit_failure_threshold: Option<u32>,
    circuit_reset_after_ms: Option<u64>,
    snapshot_path: Option<PathBuf>,
    snapshot_interval_ms: Option<u64>,
    default_policy: Option<String>,
    reconcile_mode: Option<String>,
}

impl Config {
    /// Loads from `path` if it exists, else starts from defaults; either
    /// way, `LLMFABRIC_*` environment variables are applied last and win.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let raw = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?
            }
            _ => RawConfig::default(),
        };

        let defaults = Config::default();
        let mut config = Config {
            tick_interval: raw.tick_interval_ms.map(Duration::from_millis).unwrap_or(defaults.tick_interval),
            download_poll_interval: raw
                .download_poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.download_poll_interval),
            reaper_interval: raw.reaper_interval_ms.map(Duration::from_millis).unwrap_or(defaults.reaper_interval),
            probe_timeout: raw.probe_timeout_ms.map(Duration::from_millis).unwrap_or(defaults.probe_timeout),
            circuit_failure_threshold: raw.circuit_failure_threshold.unwrap_or(defaults.circuit_failure_threshold),
            circuit_reset_after: raw
                .circuit_reset_after_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.circuit_reset_after),
            snapshot_path: raw.snapshot_path.or(defaults.snapshot_path),
            snapshot_interval: raw.snapshot_interval_ms.map(Duration::from_millis).unwrap_or(defaults.snapshot_interval),
            default_policy: raw.default_policy.unwrap_or(defaults.default_policy),
            reconcile_mode: match raw.reconcile_mode.as_deref() {
                Some("pool") => ReconcileMode::Pool,
                Some("global") | None => ReconcileMode::Global,
                Some(other) => return Err(ConfigError::InvalidReconcileMode(other.to_string())),
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(ms) = env_u64("LLMFABRIC_TICK_INTERVAL_MS") {
            self.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("LLMFABRIC_DOWNLOAD_POLL_INTERVAL_MS") {
            self.download_poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("LLMFABRIC_REAPER_INTERVAL_MS") {
            self.reaper_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("LLMFABRIC_PROBE_TIMEOUT_MS") {
            self.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = std::env::var("LLMFABRIC_CIRCUIT_FAILURE_THRESHOLD").ok().and_then(|s| s.parse().ok()) {
            self.circuit_failure_threshold = n;
        }
        if let Some(ms) = env_u64("LLMFABRIC_CIRCUIT_RESET_AFTER_MS") {
            self.circuit_reset_after = Duration::from_millis(ms);
        }
        if let Ok(path) = std::env::var("LLMFABRIC_SNAPSHOT_PATH") {
            self.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(ms) = env_u64("LLMFABRIC_SNAPSHOT_INTERVAL_MS") {
            self.snapshot_interval = Duration::from_millis(ms);
        }
        if let Ok(policy) = std::env::var("LLMFABRIC_DEFAULT_POLICY") {
            self.default_policy = policy;
        }
        if let Ok(mode) = std::env::var("LLMFABRIC_RECONCILE_MODE") {
            self.reconcile_mode = match mode.as_str() {
                "pool" => ReconcileMode::Pool,
                "global" => ReconcileMode::Global,
                other => return Err(ConfigError::InvalidReconcileMode(other.to_string())),
            };
        }
        Ok(())
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
