//! Line codec for the qmaster messages format.
//!
//! ```text
//! 07/08/2015 06:07:28.662|          worker|u1010|I|removing trigger to terminate job 3000000278.657
//! ```
//!
//! Fields are separated by `|` without any escaping, so a message that
//! itself contains `|` cannot be decoded again.

use chrono::NaiveDateTime;

use super::record::LogRecord;
use super::severity::Severity;
use crate::error::LogError;

/// `dd/mm/yyyy hh:mm:ss.mmm`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S%.3f";

/// Minimum width of the component column (right-aligned).
pub const COMPONENT_WIDTH: usize = 17;

const FIELD_COUNT: usize = 5;

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, LogError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| LogError::TimestampParse(format!("{:?}: {}", raw, e)))
}

/// Render a record as one newline-terminated line.
pub fn encode(record: &LogRecord) -> String {
    format!(
        "{}|{:>width$}|{}|{}|{}\n",
        format_timestamp(&record.timestamp),
        record.component,
        record.host,
        record.severity.code(),
        record.message,
        width = COMPONENT_WIDTH,
    )
}

/// Parse one line (with or without its trailing newline).
pub fn decode(line: &str) -> Result<LogRecord, LogError> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() != FIELD_COUNT {
        return Err(LogError::MalformedLine { fields: parts.len() });
    }

    let timestamp = parse_timestamp(parts[0])?;

    let mut code = parts[3].chars();
    let severity = match (code.next(), code.next()) {
        (Some(c), None) => Severity::from_code(c),
        _ => None,
    }
    .ok_or_else(|| LogError::InvalidSeverity(parts[3].to_string()))?;

    Ok(LogRecord {
        timestamp,
        component: parts[1].trim().to_string(),
        host: parts[2].trim().to_string(),
        severity,
        message: parts[4].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const QMASTER_LINE: &str =
        "07/08/2015 06:07:28.662|          worker|u1010|I|removing trigger to terminate job 3000000278.657";

    fn sample_record() -> LogRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(17, 5, 1, 42)
            .unwrap();
        LogRecord::new("scheduler", "node01", Severity::Warning, "queue all.q@node01 dropped")
            .with_timestamp(ts)
    }

    // ── decode ───────────────────────────────────────────────────

    #[test]
    fn test_decode_qmaster_line() {
        let rec = decode(QMASTER_LINE).unwrap();
        assert_eq!(rec.component, "worker");
        assert_eq!(rec.host, "u1010");
        assert_eq!(rec.severity, Severity::Info);
        assert_eq!(rec.message, "removing trigger to terminate job 3000000278.657");
        assert_eq!(format_timestamp(&rec.timestamp), "07/08/2015 06:07:28.662");
    }

    #[test]
    fn test_decode_accepts_trailing_newline() {
        let line = format!("{}\n", QMASTER_LINE);
        let rec = decode(&line).unwrap();
        assert_eq!(rec.message, "removing trigger to terminate job 3000000278.657");
    }

    #[test]
    fn test_decode_too_few_fields() {
        let err = decode("a|b|c").unwrap_err();
        assert!(matches!(err, LogError::MalformedLine { fields: 3 }));
    }

    #[test]
    fn test_decode_too_many_fields() {
        let line = "07/08/2015 06:07:28.662|worker|u1010|I|a|b";
        assert!(matches!(decode(line), Err(LogError::MalformedLine { fields: 6 })));
    }

    #[test]
    fn test_decode_bad_timestamp() {
        let line = "2015-08-07 06:07:28|worker|u1010|I|msg";
        assert!(matches!(decode(line), Err(LogError::TimestampParse(_))));
    }

    #[test]
    fn test_decode_bad_severity() {
        let line = "07/08/2015 06:07:28.662|worker|u1010|X|msg";
        assert!(matches!(decode(line), Err(LogError::InvalidSeverity(ref s)) if s == "X"));

        let word = "07/08/2015 06:07:28.662|worker|u1010|INFO|msg";
        assert!(matches!(decode(word), Err(LogError::InvalidSeverity(_))));
    }

    // ── encode ───────────────────────────────────────────────────

    #[test]
    fn test_encode_layout() {
        let line = encode(&sample_record());
        assert_eq!(
            line,
            "09/03/2024 17:05:01.042|        scheduler|node01|W|queue all.q@node01 dropped\n"
        );
    }

    #[test]
    fn test_encode_long_component_not_truncated() {
        let mut rec = sample_record();
        rec.component = "a_really_long_component_name".to_string();
        let line = encode(&rec);
        assert!(line.contains("|a_really_long_component_name|"));
    }

    #[test]
    fn test_round_trip() {
        for sev in Severity::ALL {
            let mut rec = sample_record();
            rec.severity = sev;
            let back = decode(&encode(&rec)).unwrap();
            assert_eq!(back, rec);
        }
    }

    #[test]
    fn test_round_trip_now_keeps_millisecond_precision() {
        let rec = LogRecord::new("worker", "u1010", Severity::Error, "boom");
        let back = decode(&encode(&rec)).unwrap();
        assert_eq!(format_timestamp(&back.timestamp), format_timestamp(&rec.timestamp));
        assert_eq!(back.component, rec.component);
        assert_eq!(back.message, rec.message);
    }

    #[test]
    fn test_message_with_pipe_breaks_round_trip() {
        let mut rec = sample_record();
        rec.message = "left|right".to_string();
        assert!(matches!(decode(&encode(&rec)), Err(LogError::MalformedLine { fields: 6 })));
    }
}
