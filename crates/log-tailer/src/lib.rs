//! Process-Scoped Log Tailer
//!
//! The core of droidtail: follow the pid a package currently owns and
//! filter the device log stream down to exactly that process, across
//! restarts, without reopening the stream.
//!
//! Two activities make up a session: the blocking read over the record
//! stream and a periodic pid re-resolution. They share a single atomic
//! cell (the tracked pid) and nothing else.

pub mod session;
pub mod tracker;

pub use session::{PidSource, TailError, TailSession};
pub use tracker::{PidTracker, TrackState, Transition};

pub use tokio_util::sync::CancellationToken;
