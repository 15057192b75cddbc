/// Grid Engine style messages log
///
/// - `severity.rs`: levels, parsing and the emit filter
/// - `settings.rs`: shared threshold / profiling toggle
/// - `record.rs`: one decoded line
/// - `codec.rs`: line <-> record
/// - `writer.rs`: filtered writer for a sink
/// - `batch.rs`: whole-file decoding

pub mod severity;
pub mod settings;
pub mod record;
pub mod codec;
pub mod writer;
pub mod batch;

pub use severity::{parse_severity, should_emit, Severity};
pub use settings::{LogSettings, SharedSettings};
pub use record::LogRecord;
pub use codec::{decode, encode};
pub use writer::Logger;
pub use batch::{parse_all, parse_file, BatchOutcome};
