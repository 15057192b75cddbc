use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid severity: {0:?}")]
    InvalidSeverity(String),

    #[error("Malformed line: expected 5 fields, found {fields}")]
    MalformedLine { fields: usize },

    #[error("Timestamp parse error: {0}")]
    TimestampParse(String),

    #[error("Cannot open {}: {source}", path.display())]
    OpenError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LogError {
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::OpenError { path: path.into(), source }
    }
}

pub type LogResult<T> = Result<T, LogError>;
