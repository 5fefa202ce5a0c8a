//! Tracked-Process State
//!
//! The single piece of shared mutable state in the tailing loop: the pid
//! currently owned by the target package. The resolver poll writes it, the
//! filter loop reads it; nothing else touches it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Android pids are positive; zero marks "no process".
const NO_PID: u32 = 0;

/// Tracking state at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// The package has no live process
    NoProcess,
    /// Filtering for a known pid
    Tracking(u32),
}

/// A state change produced by [`PidTracker::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The package came up
    Started { pid: u32 },
    /// The pid changed underneath us; the app restarted
    Restarted { old: u32, new: u32 },
    /// The package went away
    Stopped { pid: u32 },
}

/// Shared pid cell: one writer (the resolver poll), one reader (the filter
/// loop). Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct PidTracker {
    cell: Arc<AtomicU32>,
}

impl PidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// State as the filter loop sees it right now
    pub fn state(&self) -> TrackState {
        match self.cell.load(Ordering::Acquire) {
            NO_PID => TrackState::NoProcess,
            pid => TrackState::Tracking(pid),
        }
    }

    /// Record a resolution result. Returns the transition when the state
    /// changed; an identical consecutive pid is a no-op.
    pub fn observe(&self, pid: Option<u32>) -> Option<Transition> {
        let next = pid.unwrap_or(NO_PID);
        let prev = self.cell.swap(next, Ordering::AcqRel);
        match (prev, next) {
            (prev, next) if prev == next => None,
            (NO_PID, next) => Some(Transition::Started { pid: next }),
            (prev, NO_PID) => Some(Transition::Stopped { pid: prev }),
            (prev, next) => Some(Transition::Restarted {
                old: prev,
                new: next,
            }),
        }
    }

    /// Whether a record from `pid` belongs to the current process
    pub fn matches(&self, pid: u32) -> bool {
        pid != NO_PID && self.cell.load(Ordering::Acquire) == pid
    }
}
