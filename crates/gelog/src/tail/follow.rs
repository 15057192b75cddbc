//! Follow: "give me the next line appended to this file".
//!
//! [`LineSource`] is the only thing the tail producer depends on.
//! [`FileFollower`] is the polling implementation used for real files.

use std::future::Future;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, trace};

pub type NextLine<'a> = Pin<Box<dyn Future<Output = io::Result<Option<String>>> + Send + 'a>>;

/// Sequence of complete lines, yielded in order.
///
/// `Ok(None)` means the source is exhausted and will never produce again.
/// A source that follows a live file simply never returns it.
pub trait LineSource: Send {
    fn next_line(&mut self) -> NextLine<'_>;
}

/// Follows a file by reading whatever was appended and sleeping for
/// `poll_interval` whenever it is at end of file.
///
/// Only newline-terminated lines are returned; a partially written line is
/// held back until its newline shows up. If the file shrinks below the
/// current read position it is treated as truncated and read again from
/// the start.
pub struct FileFollower {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
    pending: Vec<u8>,
    poll_interval: Duration,
}

impl FileFollower {
    /// Open `path` for following. With `from_end` the current content is skipped.
    pub fn open(path: &Path, from_end: bool, poll_interval: Duration) -> io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "is a directory"));
        }
        let offset = if from_end { file.seek(SeekFrom::End(0))? } else { 0 };

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(File::from_std(file)),
            offset,
            pending: Vec::new(),
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    async fn read_next(&mut self) -> io::Result<Option<String>> {
        loop {
            let n = self.reader.read_until(b'\n', &mut self.pending).await?;
            self.offset += n as u64;

            if self.pending.last() == Some(&b'\n') {
                let mut raw = std::mem::take(&mut self.pending);
                raw.pop();
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                match String::from_utf8(raw) {
                    Ok(line) => return Ok(Some(line)),
                    Err(_) => {
                        trace!(path = %self.path.display(), "dropping non UTF-8 line");
                        continue;
                    }
                }
            }

            if n == 0 {
                self.wait_for_growth().await?;
            }
        }
    }

    async fn wait_for_growth(&mut self) -> io::Result<()> {
        let len = self.reader.get_ref().metadata().await?.len();
        if len < self.offset {
            debug!(
                path = %self.path.display(),
                "file shrank from {} to {} bytes, reading from start", self.offset, len
            );
            self.reader.seek(SeekFrom::Start(0)).await?;
            self.offset = 0;
            self.pending.clear();
            return Ok(());
        }
        tokio::time::sleep(self.poll_interval).await;
        Ok(())
    }
}

impl LineSource for FileFollower {
    fn next_line(&mut self) -> NextLine<'_> {
        Box::pin(self.read_next())
    }
}
