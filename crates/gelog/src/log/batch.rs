use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::codec::decode;
use super::record::LogRecord;
use crate::error::LogError;

/// Result of decoding a whole messages file.
///
/// A bad line does not stop the lines after it from being decoded. The
/// records that did decode are always returned together with the error of
/// the last line that did not.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<LogRecord>,
    pub last_error: Option<LogError>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.last_error.is_none()
    }

    /// Strict view: any decode failure turns the whole batch into an error.
    pub fn into_result(self) -> Result<Vec<LogRecord>, LogError> {
        match self.last_error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// Read everything from `reader` and decode it line by line.
///
/// Only a failure to read fails the call; empty lines are skipped.
/// Lines that are not valid UTF-8 are decoded lossily.
pub fn parse_all<R: Read>(mut reader: R) -> Result<BatchOutcome, LogError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(parse_bytes(&data))
}

/// Open `path` and decode it with [`parse_all`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<BatchOutcome, LogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LogError::open(path, e))?;
    parse_all(file)
}

pub fn parse_str(data: &str) -> BatchOutcome {
    parse_bytes(data.as_bytes())
}

fn parse_bytes(data: &[u8]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (idx, raw) in data.split(|&b| b == b'\n').enumerate() {
        if raw.is_empty() {
            continue;
        }
        let line = String::from_utf8_lossy(raw);
        match decode(&line) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                tracing::trace!(line = idx + 1, error = %e, "skipping undecodable line");
                outcome.last_error = Some(e);
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::severity::Severity;
    use std::io::{Cursor, Write};

    const GOOD: [&str; 3] = [
        "07/08/2015 06:07:28.662|          worker|u1010|I|removing trigger to terminate job 3000000278.657",
        "07/08/2015 06:07:29.001|        scheduler|u1010|W|no free slots",
        "07/08/2015 06:07:30.123|         listener|u1010|C|cannot bind port",
    ];

    #[test]
    fn test_partial_tolerance() {
        let data = format!("{}\n{}\nnot|a|log line\n{}\n", GOOD[0], GOOD[1], GOOD[2]);
        let outcome = parse_all(Cursor::new(data)).unwrap();
        assert_eq!(outcome.records.len(), 3);
        assert!(matches!(outcome.last_error, Some(LogError::MalformedLine { fields: 3 })));
        assert_eq!(outcome.records[2].severity, Severity::Critical);
    }

    #[test]
    fn test_last_error_wins() {
        let data = format!(
            "a|b\n{}\n07/08/2015 06:07:28.662|worker|u1010|Q|bad level\n",
            GOOD[0]
        );
        let outcome = parse_str(&data);
        assert_eq!(outcome.records.len(), 1);
        assert!(matches!(outcome.last_error, Some(LogError::InvalidSeverity(_))));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let data = format!("\n\n{}\n\n{}\n", GOOD[0], GOOD[1]);
        let outcome = parse_str(&data);
        assert!(outcome.is_clean());
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let outcome = parse_all(Cursor::new("")).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(parse_str(GOOD[0]).into_result().unwrap().len(), 1);
        assert!(parse_str("x|y").into_result().is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in GOOD {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();

        let outcome = parse_file(file.path()).unwrap();
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.records[1].component, "scheduler");
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("/nonexistent/dir/messages").unwrap_err();
        assert!(matches!(err, LogError::OpenError { .. }));
    }

    #[test]
    fn test_non_utf8_line_does_not_hide_neighbours() {
        let mut data = Vec::new();
        data.extend_from_slice(GOOD[0].as_bytes());
        data.extend_from_slice(b"\ngarbage \xff\xfe here\n");
        data.extend_from_slice(GOOD[2].as_bytes());
        data.push(b'\n');

        let outcome = parse_all(Cursor::new(data)).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].component, "worker");
        assert_eq!(outcome.records[1].component, "listener");
        assert!(matches!(outcome.last_error, Some(LogError::MalformedLine { fields: 1 })));
    }

    #[test]
    fn test_non_utf8_message_decoded_lossily() {
        let mut data = b"07/08/2015 06:07:28.662|worker|u1010|E|bad byte \xff end\n".to_vec();
        data.extend_from_slice(GOOD[1].as_bytes());

        let outcome = parse_all(Cursor::new(data)).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].message, "bad byte \u{FFFD} end");
    }
}
