//! Boot: diagnostics init and config load.
//!
//! Diagnostics go to stderr; stdout carries the Grid Engine lines and
//! decoded records.

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::conf::{GelogConfig, LogFormat, LoggingConfig};

/// Initialise the tracing subsystem before any config is available.
/// Returns a thread-local guard so `init_logging` can install the global one later.
pub fn init_logging_basic() -> tracing::subscriber::DefaultGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gelog=info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}

/// Load and validate configuration, then install logging from it.
pub fn boot() -> Result<GelogConfig, Box<dyn std::error::Error>> {
    let basic = init_logging_basic();

    let config = GelogConfig::load()?;
    config.validate()?;

    drop(basic);
    init_logging(&config.logging);

    info!(
        "Loaded configuration: threshold={}, profiling={}, component={}",
        config.threshold, config.profiling, config.component
    );
    Ok(config)
}
