use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use gelog::accounting::read_accounting_file;
use gelog::conf::GelogConfig;
use gelog::log::{parse_file, parse_severity, Logger};
use gelog::runtime::{boot, signal};
use gelog::tail::TailSession;

#[derive(Parser)]
#[command(name = "gelog", version, about = "Grid Engine messages and accounting file tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a messages file and print its records as JSON lines
    Parse { file: PathBuf },
    /// Follow a messages file until Ctrl+C, printing records as JSON lines
    Tail {
        file: PathBuf,
        /// Only show lines appended after startup
        #[arg(long)]
        from_end: bool,
    },
    /// Decode an accounting file and print its records as JSON lines
    Accounting { file: PathBuf },
    /// Write one Grid Engine formatted line to stdout
    Emit {
        severity: String,
        #[arg(required = true)]
        message: Vec<String>,
        /// Component column, defaults to the configured one
        #[arg(long, short)]
        component: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = boot::boot()
        .map_err(|e| anyhow!("{}", e))
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Parse { file } => parse(&file),
        Command::Tail { file, from_end } => tail(&config, file, from_end).await,
        Command::Accounting { file } => accounting(&file),
        Command::Emit {
            severity,
            message,
            component,
        } => emit(&config, &severity, &message.join(" "), component.as_deref()),
    }
}

fn parse(file: &Path) -> Result<()> {
    let outcome = parse_file(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut out = io::stdout().lock();
    for record in &outcome.records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!("Decoded {} records from {}", outcome.records.len(), file.display());
    match outcome.last_error {
        Some(e) => Err(e).context("Some lines could not be decoded, last error"),
        None => Ok(()),
    }
}

async fn tail(config: &GelogConfig, file: PathBuf, from_end: bool) -> Result<()> {
    let mut options = config.tail_options();
    options.from_end |= from_end;

    let mut session = TailSession::start(&file, options).context("Failed to start tail")?;
    let stopper = session.stopper();
    tokio::spawn(async move {
        signal::shutdown_signal().await;
        stopper.stop();
    });

    let mut out = io::stdout();
    while let Some(record) = session.recv().await {
        let line = serde_json::to_string(&record)?;
        if let Err(e) = writeln!(out, "{}", line) {
            warn!("stdout closed: {}", e);
            break;
        }
    }

    session.shutdown().await;
    info!("Stopped tailing {}", file.display());
    Ok(())
}

fn accounting(file: &Path) -> Result<()> {
    let records = read_accounting_file(file)
        .with_context(|| format!("Failed to read accounting file {}", file.display()))?;

    let mut out = io::stdout().lock();
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!("Decoded {} accounting records", records.len());
    Ok(())
}

fn emit(config: &GelogConfig, severity: &str, message: &str, component: Option<&str>) -> Result<()> {
    let severity = parse_severity(severity)?;
    let settings = config.to_settings();
    let logger = match &config.hostname {
        Some(host) => Logger::with_hostname(&config.component, host, io::stdout(), settings),
        None => Logger::new(&config.component, io::stdout(), settings),
    };

    if !logger.emit(component, severity, format_args!("{}", message))? {
        info!("{} message below threshold {}, not written", severity, config.threshold);
    }
    Ok(())
}
