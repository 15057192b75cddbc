use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use super::severity::{should_emit, Severity};

/// Threshold and profiling toggle shared by every logger that holds a clone.
///
/// Both values are atomics: configuration code may change them at any time
/// while loggers on other tasks keep reading them.
#[derive(Debug)]
pub struct LogSettings {
    threshold: AtomicU8,
    profiling: AtomicBool,
}

pub type SharedSettings = Arc<LogSettings>;

impl LogSettings {
    pub fn new(threshold: Severity, profiling: bool) -> Self {
        Self {
            threshold: AtomicU8::new(encode(threshold)),
            profiling: AtomicBool::new(profiling),
        }
    }

    pub fn shared(threshold: Severity, profiling: bool) -> SharedSettings {
        Arc::new(Self::new(threshold, profiling))
    }

    pub fn threshold(&self) -> Severity {
        decode(self.threshold.load(Ordering::Acquire))
    }

    pub fn set_threshold(&self, threshold: Severity) {
        self.threshold.store(encode(threshold), Ordering::Release);
    }

    pub fn profiling(&self) -> bool {
        self.profiling.load(Ordering::Acquire)
    }

    pub fn set_profiling(&self, enabled: bool) {
        self.profiling.store(enabled, Ordering::Release);
    }

    pub fn allows(&self, candidate: Severity) -> bool {
        should_emit(candidate, self.threshold(), self.profiling())
    }
}

impl Default for LogSettings {
    /// Everything is written and profiling is on.
    fn default() -> Self {
        Self::new(Severity::Info, true)
    }
}

fn encode(sev: Severity) -> u8 {
    Severity::ALL
        .iter()
        .position(|s| *s == sev)
        .unwrap_or_default() as u8
}

fn decode(raw: u8) -> Severity {
    Severity::ALL
        .get(raw as usize)
        .copied()
        .unwrap_or(Severity::Info)
}
