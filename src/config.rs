use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{PolicyResult, Priority, Status};

/// Key in `policy_priorities` used when a policy has no entry of its own
pub const DEFAULT_PRIORITY_KEY: &str = "default";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Write logs here instead of stderr
    pub log_file: Option<PathBuf>,
    pub loki: LokiConfig,
    /// Policy name to priority, for results that carry none
    pub policy_priorities: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LokiConfig {
    /// Base URL of the Loki instance, e.g. `http://loki:3100`
    pub host: Option<String>,
    /// Drop results below this priority
    pub minimum_priority: Option<Priority>,
    /// Per-request timeout; unset waits forever
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("POLICY_LOKI_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from POLICY_LOKI_CONFIG: {}", e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("policy-loki").join("policy-loki.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./policy-loki.yaml (for development)
        let local_config = PathBuf::from("policy-loki.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Priority for a result that arrived without one
    pub fn resolve_priority(&self, result: &PolicyResult) -> String {
        if let Some(priority) = self
            .policy_priorities
            .get(&result.policy)
            .or_else(|| self.policy_priorities.get(DEFAULT_PRIORITY_KEY))
        {
            return priority.clone();
        }

        match result.status {
            Status::Fail | Status::Error => Priority::Warning.to_string(),
            _ => Priority::INFORMATION.to_string(),
        }
    }

    /// Fill in missing priorities in place
    pub fn apply_priorities(&self, results: &mut [PolicyResult]) {
        for result in results.iter_mut().filter(|r| r.priority.is_empty()) {
            result.priority = self.resolve_priority(result);
        }
    }
}
