//! Android Device Bridge
//!
//! Talks to devices through the adb executable: device discovery, process
//! listing, and logcat streaming.

pub mod adb;
pub mod device;
pub mod logcat;
pub mod process;

pub use adb::{AdbClient, AdbError};
pub use device::{Device, DeviceKind, DeviceState};
pub use logcat::{LogBuffer, LogEntry, LogFilter, LogLevel, LogcatError, LogcatReader};
pub use process::ProcessResolver;
