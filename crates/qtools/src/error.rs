use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QtoolsError {
    #[error("{program} exited with status {status:?}: {stderr}")]
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("qstat XML unmarshal error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("User list parse error: {0}")]
    UserList(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type QtoolsResult<T> = Result<T, QtoolsError>;
