//! droidtail
//!
//! A command-line companion for Android development that tails the device
//! log scoped to one application's current process, surviving restarts
//! without reopening the stream.
//!
//! ## Architecture
//!
//! droidtail is organized into focused crates:
//!
//! - `droidtail-core`: error type, configuration, Gradle introspection
//! - `droidtail-device-bridge`: adb client, devices, process and logcat access
//! - `droidtail-log-tailer`: the restart-aware filtering loop

pub mod cli;
pub mod commands;

// Re-export main components for library usage
pub use droidtail_core as core;
pub use droidtail_device_bridge as device_bridge;
pub use droidtail_log_tailer as log_tailer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidtail_core::{AppConfig, ProjectInfo};
    pub use droidtail_device_bridge::{AdbClient, LogEntry, LogcatReader, ProcessResolver};
    pub use droidtail_log_tailer::{PidTracker, TailSession};
}
