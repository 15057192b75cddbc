//! Runtime module: process boot and the stop signal.

pub mod boot;
pub mod signal;
