// Module structure for the qtools library.

pub mod config;
pub mod error;
pub mod runner;

pub mod qstat;
pub mod userlist;

pub use error::{QtoolsError, QtoolsResult};
