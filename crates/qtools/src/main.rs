use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use qtools::config::{LogFormat, QtoolsConfig};
use qtools::qstat::qstat_f;
use qtools::runner::ProcessRunner;
use qtools::userlist::get_user_lists;

#[derive(Parser)]
#[command(name = "qtools", version, about = "Grid Engine qstat / qconf helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Queue instances from `qstat -f -xml`, as JSON
    Qstat {
        /// Queue filter passed to `-q`
        #[arg(long, short, default_value = "*")]
        queue: String,
    },
    /// Access lists from `qconf -su`, as JSON
    Userlists {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Phase 1: Basic tracing so we can log during config loading
    let basic_tracing = init_tracing_basic();

    let config = QtoolsConfig::load().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level)
    drop(basic_tracing);
    init_tracing_from_config(&config);

    info!(
        "SGE_ROOT={}, arch={}",
        config.sge_root.as_deref().unwrap_or("<unset>"),
        config.arch
    );
    let runner = ProcessRunner::new(config.timeout());

    let json = match cli.command {
        Command::Qstat { queue } => {
            let queues = qstat_f(&runner, &config, &queue)
                .await
                .context("qstat -f failed")?;
            serde_json::to_string_pretty(&queues)?
        }
        Command::Userlists { names } => {
            let lists = get_user_lists(&runner, &config, &names)
                .await
                .context("qconf -su failed")?;
            serde_json::to_string_pretty(&lists)?
        }
    };
    println!("{}", json);
    Ok(())
}

/// Phase 1: thread-local subscriber used until the config is known.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,qtools=info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: global subscriber honouring the configured level and format.
fn init_tracing_from_config(config: &QtoolsConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Prefer RUST_LOG env var, fall back to config level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
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
                .with_file(false)
                .with_line_number(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}
