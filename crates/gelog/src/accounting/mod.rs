//! Grid Engine accounting file decoding.
//!
//! - `record.rs`: the 53 column record
//! - `schema.rs`: column order, kinds and setters
//! - `decode.rs`: line and file decoding

pub mod record;
pub mod schema;
pub mod decode;

pub use decode::{
    decode_fields, decode_line, read_accounting, read_accounting_file, FieldValue, MILLIS_THRESHOLD,
};
pub use record::AccountingRecord;
pub use schema::{column_index, FieldKind, FieldSpec, SCHEMA};
