use std::fmt;
use std::io::Write;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use super::codec;
use super::record::LogRecord;
use super::settings::SharedSettings;
use super::severity::Severity;
use crate::error::LogError;

/// Writes lines in the qmaster messages format to a sink.
///
/// Every call that passes the severity filter appends exactly one line and
/// flushes the sink; nothing is buffered here.
pub struct Logger<W: Write> {
    component: String,
    hostname: String,
    settings: SharedSettings,
    sink: Mutex<W>,
}

impl<W: Write> Logger<W> {
    /// Logger whose host column is the name of this machine.
    pub fn new(component: impl Into<String>, sink: W, settings: SharedSettings) -> Self {
        Self::with_hostname(component, local_hostname(), sink, settings)
    }

    /// Logger with an explicit host column, for output on behalf of another host.
    pub fn with_hostname(
        component: impl Into<String>,
        hostname: impl Into<String>,
        sink: W,
        settings: SharedSettings,
    ) -> Self {
        Self {
            component: component.into(),
            hostname: hostname.into(),
            settings,
            sink: Mutex::new(sink),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Filter, format and write one line. Returns `Ok(false)` when the
    /// record was filtered out.
    pub fn emit(
        &self,
        component: Option<&str>,
        severity: Severity,
        message: fmt::Arguments<'_>,
    ) -> Result<bool, LogError> {
        if !self.settings.allows(severity) {
            return Ok(false);
        }
        let record = LogRecord::new(
            component.unwrap_or(&self.component),
            self.hostname.as_str(),
            severity,
            message.to_string(),
        );
        self.write_line(&codec::encode(&record))?;
        Ok(true)
    }

    /// Re-emit an existing record under this logger's host with a fresh timestamp.
    pub fn log_record(&self, record: &LogRecord) -> Result<bool, LogError> {
        self.emit(
            Some(record.component.as_str()),
            record.severity,
            format_args!("{}", record.message),
        )
    }

    /// Write a profiling line `"<event> took <duration>"`.
    pub fn create_profile(
        &self,
        start: DateTime<Local>,
        stop: DateTime<Local>,
        event: &str,
    ) -> Result<bool, LogError> {
        let took = format_elapsed(stop - start);
        self.emit(None, Severity::Profile, format_args!("{} took {}", event, took))
    }

    pub fn info(&self, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(None, Severity::Info, format_args!("{}", message))
    }

    pub fn warning(&self, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(None, Severity::Warning, format_args!("{}", message))
    }

    pub fn error(&self, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(None, Severity::Error, format_args!("{}", message))
    }

    pub fn critical(&self, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(None, Severity::Critical, format_args!("{}", message))
    }

    pub fn profile(&self, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(None, Severity::Profile, format_args!("{}", message))
    }

    pub fn info_for(&self, component: &str, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(Some(component), Severity::Info, format_args!("{}", message))
    }

    pub fn warning_for(&self, component: &str, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(Some(component), Severity::Warning, format_args!("{}", message))
    }

    pub fn error_for(&self, component: &str, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(Some(component), Severity::Error, format_args!("{}", message))
    }

    pub fn critical_for(&self, component: &str, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(Some(component), Severity::Critical, format_args!("{}", message))
    }

    pub fn profile_for(&self, component: &str, message: impl fmt::Display) -> Result<bool, LogError> {
        self.emit(Some(component), Severity::Profile, format_args!("{}", message))
    }

    /// Give back the sink, e.g. to inspect an in-memory buffer.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn write_line(&self, line: &str) -> Result<(), LogError> {
        let mut sink = self.sink.lock();
        sink.write_all(line.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

/// Render a span like Go's `time.Duration` does: `1m30s`, `1.5ms`, `-2s`.
fn format_elapsed(delta: chrono::Duration) -> String {
    let (sign, span) = match delta.to_std() {
        Ok(span) => ("", span),
        Err(_) => ("-", (-delta).to_std().unwrap_or_default()),
    };
    let nanos = span.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    let body = if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{}µs", with_fraction(nanos / 1_000, nanos % 1_000, 3))
    } else if nanos < 1_000_000_000 {
        format!("{}ms", with_fraction(nanos / 1_000_000, nanos % 1_000_000, 6))
    } else {
        let secs = nanos / 1_000_000_000;
        let seconds = with_fraction(secs % 60, nanos % 1_000_000_000, 9);
        let (hours, minutes) = (secs / 3600, secs / 60 % 60);
        if hours > 0 {
            format!("{}h{}m{}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m{}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    };
    format!("{}{}", sign, body)
}

fn with_fraction(whole: u128, frac: u128, digits: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!("Cannot determine host name, using \"localhost\": {}", e);
            "localhost".to_string()
        }
    }
}
