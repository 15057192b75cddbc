//! Tail: follow a growing messages file and stream decoded records.
//!
//! - `follow.rs`: the line-source contract and the polling file follower
//! - `session.rs`: producer task, bounded channel and cooperative stop

pub mod follow;
pub mod session;

pub use follow::{FileFollower, LineSource};
pub use session::{spawn_tail, TailOptions, TailSession, TailState, TailStopper};
