use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use super::record::AccountingRecord;
use super::schema::{FieldKind, FieldSpec, Setter, SCHEMA};
use crate::error::{LogError, LogResult};

/// Integers above this magnitude are epoch milliseconds, smaller ones are
/// epoch seconds (1990-01-01 in seconds, about 7 days in milliseconds).
pub const MILLIS_THRESHOLD: i64 = 631_152_000_000;

const ESCAPED_COLON: u8 = 0xFF;

/// A single decoded column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int64(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldSpec {
    /// Store `value` in the record field this column maps to. A value of the
    /// wrong kind is ignored.
    pub fn apply(&self, record: &mut AccountingRecord, value: FieldValue) {
        match (self.setter, value) {
            (Setter::Text(set), FieldValue::Text(v)) => set(record, v),
            (Setter::Int64(set), FieldValue::Int64(v)) => set(record, v),
            (Setter::Float(set), FieldValue::Float(v)) => set(record, v),
            (Setter::Timestamp(set), FieldValue::Timestamp(v)) => set(record, v),
            (_, other) => trace!(column = self.name, ?other, "value kind does not match column"),
        }
    }
}

/// Decode one accounting line. Never fails: columns that do not parse keep
/// their zero value, missing trailing columns keep their default and extra
/// columns are ignored.
pub fn decode_line(raw: &[u8]) -> AccountingRecord {
    let mut record = AccountingRecord::default();
    for (spec, chunk) in SCHEMA.iter().zip(split_columns(raw)) {
        spec.apply(&mut record, decode_value(spec.kind(), &chunk));
    }
    record
}

/// Decode one line into `(column name, value)` pairs, in column order.
pub fn decode_fields(raw: &[u8]) -> Vec<(&'static str, FieldValue)> {
    SCHEMA
        .iter()
        .zip(split_columns(raw))
        .map(|(spec, chunk)| (spec.name, decode_value(spec.kind(), &chunk)))
        .collect()
}

/// Decode every record of an accounting file. Blank lines and `#` comment
/// headers are skipped; only I/O errors are returned.
pub fn read_accounting<R: BufRead>(mut reader: R) -> LogResult<Vec<AccountingRecord>> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = trim_line_end(&buf);
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        records.push(decode_line(line));
    }
    Ok(records)
}

pub fn read_accounting_file(path: &Path) -> LogResult<Vec<AccountingRecord>> {
    let file = File::open(path).map_err(|e| LogError::open(path, e))?;
    read_accounting(BufReader::new(file))
}

fn trim_line_end(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &raw[..end]
}

fn split_columns(raw: &[u8]) -> impl Iterator<Item = Vec<u8>> + '_ {
    trim_line_end(raw).split(|b| *b == b':').map(|chunk| {
        chunk
            .iter()
            .map(|&b| if b == ESCAPED_COLON { b':' } else { b })
            .collect()
    })
}

fn decode_value(kind: FieldKind, chunk: &[u8]) -> FieldValue {
    let text = String::from_utf8_lossy(chunk);
    match kind {
        FieldKind::Text => FieldValue::Text(text.into_owned()),
        FieldKind::Int64 => FieldValue::Int64(text.parse().unwrap_or(0)),
        FieldKind::Float => FieldValue::Float(text.parse().unwrap_or(0.0)),
        FieldKind::Timestamp => FieldValue::Timestamp(decode_timestamp(&text)),
    }
}

fn decode_timestamp(text: &str) -> DateTime<Utc> {
    let Ok(n) = text.parse::<i64>() else {
        return DateTime::default();
    };
    let decoded = if n.unsigned_abs() > MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    };
    decoded.unwrap_or_default()
}
