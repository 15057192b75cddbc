use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{QtoolsError, QtoolsResult};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QtoolsConfig {
    /// Grid Engine installation root. Falls back to `$SGE_ROOT`.
    pub sge_root: Option<String>,
    /// Architecture directory under `$SGE_ROOT/bin`.
    pub arch: String,
    /// Upper bound for a single qstat/qconf call.
    pub timeout_secs: u64,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Default for QtoolsConfig {
    fn default() -> Self {
        Self {
            sge_root: None,
            arch: "lx-amd64".to_string(),
            timeout_secs: 30,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "qtools=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl QtoolsConfig {
    /// Load configuration from qtools.toml and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = config::Config::try_from(&QtoolsConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        // 1. /etc/qtools/qtools.toml (site wide)
        // 2. qtools.toml (working directory)
        for path in ["/etc/qtools/qtools", "qtools"] {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Nested keys use double underscores: QTOOLS__LOGGING__LEVEL
        builder = builder.add_source(
            config::Environment::with_prefix("QTOOLS")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: QtoolsConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if cfg.sge_root.is_none() {
            cfg.sge_root = std::env::var("SGE_ROOT").ok().filter(|s| !s.is_empty());
        }
        Ok(cfg)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.arch.is_empty() {
            anyhow::bail!("arch must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be > 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `$SGE_ROOT/bin/<arch>/<name>`. Fails when no root is configured.
    pub fn sge_binary(&self, name: &str) -> QtoolsResult<PathBuf> {
        match self.sge_root.as_deref() {
            Some(root) if !root.is_empty() => {
                Ok(PathBuf::from(root).join("bin").join(&self.arch).join(name))
            }
            _ => Err(QtoolsError::Config("$SGE_ROOT environment variable not set".to_string())),
        }
    }

    /// Like [`sge_binary`](Self::sge_binary) but falls back to a `$PATH` lookup.
    pub fn command(&self, name: &str) -> String {
        self.sge_binary(name)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = QtoolsConfig::default();
        assert!(cfg.sge_root.is_none());
        assert_eq!(cfg.arch, "lx-amd64");
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let cfg = QtoolsConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_sge_binary_path() {
        let cfg = QtoolsConfig {
            sge_root: Some("/opt/uge".to_string()),
            ..Default::default()
        };
        assert_eq!(
            cfg.sge_binary("qconf").unwrap(),
            PathBuf::from("/opt/uge/bin/lx-amd64/qconf")
        );
        assert_eq!(cfg.command("qstat"), "/opt/uge/bin/lx-amd64/qstat");
    }

    #[test]
    fn test_sge_binary_without_root() {
        let cfg = QtoolsConfig::default();
        assert!(matches!(cfg.sge_binary("qconf"), Err(QtoolsError::Config(_))));
        assert_eq!(cfg.command("qstat"), "qstat");
    }

    #[test]
    fn test_layered_sources() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("qtools.toml");
        std::fs::write(&file, "arch = \"lx-arm64\"\n[logging]\nformat = \"json\"\n").unwrap();

        let defaults = config::Config::try_from(&QtoolsConfig::default()).unwrap();
        let cfg: QtoolsConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(file.clone()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.arch, "lx-arm64");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.timeout_secs, 30);
    }
}
