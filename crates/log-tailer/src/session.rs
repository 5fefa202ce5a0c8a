//! Tail Session
//!
//! Couples the two activities of the tailing loop: the blocking read over
//! the record stream and the periodic pid re-resolution. They communicate
//! only through the [`PidTracker`] cell, so neither can stall the other;
//! a restart is picked up within one poll interval.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use droidtail_device_bridge::{LogEntry, ProcessResolver};

use crate::tracker::{PidTracker, Transition};

/// Tail session errors
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// The record stream ended underneath us: the device is gone or adb
    /// exited.
    #[error("log stream closed; device disconnected or adb exited")]
    StreamClosed,
}

/// Source of the package's current pid, queried once per poll interval.
///
/// A transient failure is reported as `None`: the cycle is skipped and the
/// next tick retries.
pub trait PidSource: Send + 'static {
    /// Resolve the current pid, or `None` when the package is not running
    fn current_pid(&mut self) -> impl Future<Output = Option<u32>> + Send;
}

impl PidSource for ProcessResolver {
    fn current_pid(&mut self) -> impl Future<Output = Option<u32>> + Send {
        async move {
            match self.resolve().await {
                Ok(pid) => pid,
                Err(err) => {
                    debug!("pid resolution failed, treating as not running: {err}");
                    None
                }
            }
        }
    }
}

/// One live filtering run over a device's log stream
pub struct TailSession {
    tracker: PidTracker,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl TailSession {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            tracker: PidTracker::new(),
            poll_interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token callers use to stop the session (e.g. from a Ctrl-C handler)
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until cancelled (`Ok`) or until the record stream closes
    /// (`Err(StreamClosed)`).
    ///
    /// Records whose pid matches the currently tracked process go to `out`;
    /// everything else is dropped, unbuffered. Transitions are published on
    /// `events` best-effort. The poll task is stopped and awaited before
    /// this returns, so nothing outlives the session.
    pub async fn run<S: PidSource>(
        self,
        source: S,
        mut records: mpsc::Receiver<LogEntry>,
        out: mpsc::Sender<LogEntry>,
        events: mpsc::Sender<Transition>,
    ) -> Result<(), TailError> {
        let poll = tokio::spawn(poll_pid(
            source,
            self.tracker.clone(),
            self.poll_interval,
            self.cancel.clone(),
            events,
        ));

        let result = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break Ok(()),
                record = records.recv() => match record {
                    Some(entry) => {
                        if self.tracker.matches(entry.pid) {
                            if out.send(entry).await.is_err() {
                                // Display side hung up; nothing left to show
                                break Ok(());
                            }
                        }
                    }
                    None => break Err(TailError::StreamClosed),
                },
            }
        };

        self.cancel.cancel();
        let _ = poll.await;
        result
    }
}

/// The re-resolution activity: one pid query per tick, published through
/// the shared tracker. Never touches the record stream.
async fn poll_pid<S: PidSource>(
    mut source: S,
    tracker: PidTracker,
    interval: Duration,
    cancel: CancellationToken,
    events: mpsc::Sender<Transition>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {
                let pid = source.current_pid().await;
                if let Some(transition) = tracker.observe(pid) {
                    debug!("process transition: {transition:?}");
                    // try_send: a slow status consumer must not delay the
                    // next poll cycle
                    let _ = events.try_send(transition);
                }
            }
        }
    }
}
