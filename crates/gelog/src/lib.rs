// Module structure for the gelog library.

// Core infrastructure
pub mod error;
pub mod conf;
pub mod runtime;

// Domain modules
pub mod log;
pub mod tail;
pub mod accounting;

pub use error::{LogError, LogResult};
