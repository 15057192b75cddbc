//! Model: GelogConfig and related structs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::log::{LogSettings, Severity, SharedSettings};
use crate::tail::TailOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GelogConfig {
    /// Lowest severity written by `emit`.
    pub threshold: Severity,
    pub profiling: bool,
    /// Component column used when a message does not name one.
    pub component: String,
    /// Host column override. Unset means the name of this machine.
    pub hostname: Option<String>,
    pub tail: TailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    pub capacity: usize,
    pub poll_interval_ms: u64,
    pub from_end: bool,
}

/// Diagnostics of the binary itself, not the Grid Engine log it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for GelogConfig {
    fn default() -> Self {
        Self {
            threshold: Severity::Info,
            profiling: true,
            component: "gelog".to_string(),
            hostname: None,
            tail: TailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            capacity: crate::tail::session::DEFAULT_CAPACITY,
            poll_interval_ms: 250,
            from_end: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "gelog=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl GelogConfig {
    pub fn to_settings(&self) -> SharedSettings {
        LogSettings::shared(self.threshold, self.profiling)
    }

    pub fn tail_options(&self) -> TailOptions {
        TailOptions {
            capacity: self.tail.capacity,
            poll_interval: Duration::from_millis(self.tail.poll_interval_ms),
            from_end: self.tail.from_end,
        }
    }
}

impl TailConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("tail.capacity must be > 0".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("tail.poll_interval_ms must be > 0".to_string());
        }
        Ok(())
    }
}
