use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// One line of a Grid Engine style messages file.
///
/// Timestamps are wall-clock local time without a zone, exactly as the
/// line format carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub component: String,
    pub host: String,
    pub severity: Severity,
    pub message: String,
}

impl LogRecord {
    /// Build a record stamped with the current local time.
    pub fn new(
        component: impl Into<String>,
        host: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            component: component.into(),
            host: host.into(),
            severity,
            message: message.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}
