//! Runner: executes Grid Engine client commands.
//!
//! Everything that shells out goes through [`CommandRunner`] so the parsers
//! can be exercised against canned output.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{QtoolsError, QtoolsResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

pub type RunFuture = Pin<Box<dyn Future<Output = QtoolsResult<CommandOutput>> + Send>>;

#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    /// A non-zero exit is not an error at this level.
    fn run(&self, program: String, args: Vec<String>) -> RunFuture;
}

/// Runs commands as child processes, killing them after `timeout`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: String, args: Vec<String>) -> RunFuture {
        let timeout = self.timeout;
        Box::pin(async move {
            debug!("Running {} {}", program, args.join(" "));
            let mut cmd = Command::new(&program);
            cmd.args(&args).kill_on_drop(true);

            let output = match tokio::time::timeout(timeout, cmd.output()).await {
                Ok(result) => result.map_err(|source| QtoolsError::Io {
                    program: program.clone(),
                    source,
                })?,
                Err(_) => return Err(QtoolsError::Timeout { program, timeout }),
            };

            Ok(CommandOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}

/// Run a command and turn a non-zero exit into [`QtoolsError::CommandFailed`].
pub async fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: Vec<String>,
) -> QtoolsResult<CommandOutput> {
    let output = runner.run(program.to_string(), args).await?;
    if !output.success() {
        warn!("{} exited with {:?}: {}", program, output.status, output.stderr.trim());
        return Err(QtoolsError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr: output.stderr,
        });
    }
    Ok(output)
}
