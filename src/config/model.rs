//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI appearance and refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Shown at the left of the top bar.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Path loaded at startup.
    #[serde(default = "default_start_path")]
    pub start_path: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            start_path: default_start_path(),
        }
    }
}

/// Where the persisted store keeps its snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// When false, state lives in memory only and is lost on exit.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Overrides the platform data directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("paneshell")
                .join("storage"),
        }
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_level(),
        }
    }
}

fn default_title() -> String {
    "paneshell".to_string()
}
fn default_tick_rate_ms() -> u64 {
    250
}
fn default_start_path() -> String {
    "/".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "~/.local/share/paneshell/logs".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
