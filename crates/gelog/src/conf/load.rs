//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{GelogConfig, LogFormat};
use crate::log::parse_severity;

pub const DEFAULT_CONFIG_FILE: &str = "/etc/gelog/gelog.toml";

impl GelogConfig {
    /// Load configuration from file and environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path =
            std::env::var("GELOG_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: GelogConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override fields from `GELOG_*` variables returned by `lookup`.
    ///
    /// Unparseable numbers and booleans are ignored. An unknown severity is
    /// an error.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("GELOG_THRESHOLD") {
            self.threshold = parse_severity(&level)?;
        }
        if let Some(enabled) = lookup("GELOG_PROFILING").and_then(|s| s.parse().ok()) {
            self.profiling = enabled;
        }
        if let Some(component) = lookup("GELOG_COMPONENT") {
            self.component = component;
        }
        if let Some(host) = lookup("GELOG_HOSTNAME") {
            self.hostname = Some(host);
        }
        if let Some(capacity) = lookup("GELOG_TAIL_CAPACITY").and_then(|s| s.parse().ok()) {
            self.tail.capacity = capacity;
        }
        if let Some(ms) = lookup("GELOG_TAIL_POLL_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            self.tail.poll_interval_ms = ms;
        }
        if let Some(from_end) = lookup("GELOG_TAIL_FROM_END").and_then(|s| s.parse().ok()) {
            self.tail.from_end = from_end;
        }
        if let Some(level) = lookup("GELOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        match lookup("GELOG_LOG_FORMAT").as_deref() {
            Some("json") => self.logging.format = LogFormat::Json,
            Some("pretty") => self.logging.format = LogFormat::Pretty,
            _ => {}
        }
        Ok(())
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.component.is_empty() {
            return Err("component must not be empty".to_string());
        }
        if self.component.contains('|') {
            return Err("component must not contain '|'".to_string());
        }
        if matches!(&self.hostname, Some(h) if h.is_empty() || h.contains('|')) {
            return Err("hostname must be non-empty and must not contain '|'".to_string());
        }
        self.tail.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── from_file ────────────────────────────────────────────────

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "component = \"execd\"\nprofiling = false").unwrap();

        let cfg = GelogConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.component, "execd");
        assert!(!cfg.profiling);
        assert_eq!(cfg.threshold, Severity::Info);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(GelogConfig::from_file("/nonexistent/gelog.toml").is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tail = 5").unwrap();
        assert!(GelogConfig::from_file(file.path().to_str().unwrap()).is_err());
    }

    // ── Environment overrides ────────────────────────────────────

    #[test]
    fn test_env_overrides_file_values() {
        let mut cfg = GelogConfig {
            component: "from_file".to_string(),
            ..Default::default()
        };
        cfg.apply_env(env(&[
            ("GELOG_THRESHOLD", "CRITICAL"),
            ("GELOG_PROFILING", "false"),
            ("GELOG_COMPONENT", "qmaster"),
            ("GELOG_HOSTNAME", "maui"),
            ("GELOG_TAIL_CAPACITY", "16"),
            ("GELOG_TAIL_POLL_INTERVAL_MS", "100"),
            ("GELOG_TAIL_FROM_END", "true"),
            ("GELOG_LOG_LEVEL", "debug"),
            ("GELOG_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(cfg.threshold, Severity::Critical);
        assert!(!cfg.profiling);
        assert_eq!(cfg.component, "qmaster");
        assert_eq!(cfg.hostname.as_deref(), Some("maui"));
        assert_eq!(cfg.tail.capacity, 16);
        assert_eq!(cfg.tail.poll_interval_ms, 100);
        assert!(cfg.tail.from_end);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_empty_keeps_values() {
        let mut cfg = GelogConfig::default();
        cfg.apply_env(env(&[])).unwrap();
        assert_eq!(cfg.component, "gelog");
        assert_eq!(cfg.tail.capacity, 1024);
    }

    #[test]
    fn test_env_unparseable_number_ignored() {
        let mut cfg = GelogConfig::default();
        cfg.apply_env(env(&[("GELOG_TAIL_CAPACITY", "lots")])).unwrap();
        assert_eq!(cfg.tail.capacity, 1024);
    }

    #[test]
    fn test_env_bad_threshold_rejected() {
        let mut cfg = GelogConfig::default();
        assert!(cfg.apply_env(env(&[("GELOG_THRESHOLD", "verbose")])).is_err());
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_validate_default_passes() {
        assert!(GelogConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_pipe_in_component() {
        let cfg = GelogConfig {
            component: "a|b".to_string(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("component"), "Error should mention component: {}", err);
    }

    #[test]
    fn test_validate_rejects_empty_hostname_override() {
        let cfg = GelogConfig {
            hostname: Some(String::new()),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_checks_tail() {
        let mut cfg = GelogConfig::default();
        cfg.tail.capacity = 0;
        assert!(cfg.validate().unwrap_err().contains("capacity"));
    }
}
