use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::follow::{FileFollower, LineSource};
use crate::error::LogError;
use crate::log::codec;
use crate::log::LogRecord;

pub const DEFAULT_CAPACITY: usize = 1024;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Records buffered between producer and consumer before the producer blocks.
    pub capacity: usize,
    /// Sleep between checks for new data once the follower is at end of file.
    pub poll_interval: Duration,
    /// Skip the content already in the file.
    pub from_end: bool,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            from_end: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailState {
    Following,
    Stopped,
}

/// Cloneable handle that stops a session from another task.
#[derive(Debug, Clone)]
pub struct TailStopper {
    cancel: CancellationToken,
}

impl TailStopper {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A live follow of one file.
///
/// Decoded records arrive in file order; lines that do not decode are
/// dropped. Stopping cancels a token that the producer checks before every
/// read and every send, so nothing is sent once a stop was requested, and
/// [`TailSession::recv`] returns `None` from then on even if records were
/// still buffered. A stopped session cannot be resumed.
pub struct TailSession {
    records: mpsc::Receiver<LogRecord>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TailSession {
    /// Open `path` and start following it.
    ///
    /// The file is opened before this returns, so a missing or unreadable
    /// path fails here and no session is created. Must be called from
    /// within a tokio runtime.
    pub fn start(path: impl AsRef<Path>, options: TailOptions) -> Result<Self, LogError> {
        let path = path.as_ref();
        let follower = FileFollower::open(path, options.from_end, options.poll_interval)
            .map_err(|e| LogError::open(path, e))?;
        info!(
            "Tailing {} (capacity={}, poll={:?}, from_end={})",
            path.display(),
            options.capacity,
            options.poll_interval,
            options.from_end
        );
        Ok(spawn_tail(follower, &options))
    }

    /// Next record, or `None` once the session is stopped or the source ended.
    pub async fn recv(&mut self) -> Option<LogRecord> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            record = self.records.recv() => record,
        }
    }

    /// Request the stop. Idempotent and callable while the producer is
    /// blocked on a send.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Stopping tail session");
        }
        self.cancel.cancel();
    }

    /// Stop and wait for the producer to exit, which releases the file.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Tail producer ended abnormally: {}", e);
            }
        }
        self.records.close();
    }

    pub fn stopper(&self) -> TailStopper {
        TailStopper { cancel: self.cancel.clone() }
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == TailState::Stopped
    }

    /// `Stopped` after a stop request or once the producer gave up
    /// (source exhausted or read error).
    pub fn state(&self) -> TailState {
        let finished = self.task.as_ref().map_or(true, |t| t.is_finished());
        if self.cancel.is_cancelled() || finished {
            TailState::Stopped
        } else {
            TailState::Following
        }
    }
}

impl Stream for TailSession {
    type Item = LogRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        self.records.poll_recv(cx)
    }
}

impl Drop for TailSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Run the tail producer over any line source.
pub fn spawn_tail<S>(source: S, options: &TailOptions) -> TailSession
where
    S: LineSource + 'static,
{
    let (tx, rx) = mpsc::channel(options.capacity.max(1));
    let cancel = CancellationToken::new();
    let task = tokio::spawn(produce(source, tx, cancel.clone()));

    TailSession {
        records: rx,
        cancel,
        task: Some(task),
    }
}

async fn produce<S: LineSource>(mut source: S, tx: mpsc::Sender<LogRecord>, cancel: CancellationToken) {
    let mut delivered: u64 = 0;
    let mut dropped: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = source.next_line() => next,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Tail source exhausted");
                break;
            }
            Err(e) => {
                warn!("Tail read failed, ending session: {}", e);
                break;
            }
        };

        let record = match codec::decode(&line) {
            Ok(record) => record,
            Err(e) => {
                dropped = dropped.saturating_add(1);
                trace!(error = %e, "dropping undecodable line");
                continue;
            }
        };

        // blocks while the channel is full
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(record) => {
                if sent.is_err() {
                    debug!("Tail receiver dropped");
                    break;
                }
            }
        }
        delivered = delivered.saturating_add(1);
    }

    debug!(delivered, dropped, "Tail producer finished");
}
