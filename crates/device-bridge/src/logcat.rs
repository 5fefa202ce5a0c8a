//! Logcat Stream
//!
//! Spawns `adb logcat` and turns its output into parsed records. Parsing is
//! deliberately tolerant: a line that does not fit the threadtime shape is
//! skipped, never an error, so one garbled line cannot stall the stream.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::trace;

use crate::adb::{AdbClient, AdbError};

/// Logcat errors
#[derive(Debug, thiserror::Error)]
pub enum LogcatError {
    #[error(transparent)]
    Adb(#[from] AdbError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Log priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Silent,
}

impl LogLevel {
    /// Parse a priority letter; `None` for anything that is not one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'V' => Some(LogLevel::Verbose),
            'D' => Some(LogLevel::Debug),
            'I' => Some(LogLevel::Info),
            'W' => Some(LogLevel::Warning),
            'E' => Some(LogLevel::Error),
            'F' => Some(LogLevel::Fatal),
            'S' => Some(LogLevel::Silent),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LogLevel::Verbose => 'V',
            LogLevel::Debug => 'D',
            LogLevel::Info => 'I',
            LogLevel::Warning => 'W',
            LogLevel::Error => 'E',
            LogLevel::Fatal => 'F',
            LogLevel::Silent => 'S',
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    /// Accepts a priority letter (`W`) or name (`warning`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v" | "verbose" => Ok(LogLevel::Verbose),
            "d" | "debug" => Ok(LogLevel::Debug),
            "i" | "info" => Ok(LogLevel::Info),
            "w" | "warn" | "warning" => Ok(LogLevel::Warning),
            "e" | "error" => Ok(LogLevel::Error),
            "f" | "fatal" => Ok(LogLevel::Fatal),
            "s" | "silent" => Ok(LogLevel::Silent),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// One parsed logcat line (threadtime format)
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp (`MM-DD HH:MM:SS.mmm`)
    pub timestamp: String,
    /// Originating process id
    pub pid: u32,
    /// Originating thread id
    pub tid: u32,
    /// Priority
    pub level: LogLevel,
    /// Tag
    pub tag: String,
    /// Message text
    pub message: String,
    /// Raw line as read from the device
    pub raw: String,
}

impl LogEntry {
    /// Parse one threadtime line:
    /// `MM-DD HH:MM:SS.mmm  PID  TID LEVEL TAG: MESSAGE`
    ///
    /// Columns are padded with variable-width whitespace. Anything that does
    /// not fit the shape (buffer markers, truncated lines) yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let (date, rest) = token(line)?;
        let (time, rest) = token(rest)?;
        let (pid, rest) = token(rest)?;
        let pid: u32 = pid.parse().ok()?;
        let (tid, rest) = token(rest)?;
        let tid: u32 = tid.parse().ok()?;
        let (level, rest) = token(rest)?;

        let mut chars = level.chars();
        let level = match (chars.next(), chars.next()) {
            (Some(c), None) => LogLevel::from_char(c)?,
            _ => return None,
        };

        let rest = rest.trim_start();
        let (tag, message) = if let Some(idx) = rest.find(": ") {
            (&rest[..idx], &rest[idx + 2..])
        } else if let Some(stripped) = rest.strip_suffix(':') {
            // Tag with an empty message
            (stripped, "")
        } else {
            return None;
        };

        Some(LogEntry {
            timestamp: format!("{date} {time}"),
            pid,
            tid,
            level,
            tag: tag.to_string(),
            message: message.to_string(),
            raw: line.to_string(),
        })
    }

    /// Plain single-line rendering
    pub fn formatted(&self) -> String {
        format!(
            "{} {:>5} {} {}: {}",
            self.timestamp,
            self.pid,
            self.level.as_char(),
            self.tag,
            self.message
        )
    }
}

/// Split off the next whitespace-delimited token
fn token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Display-side filter, applied after pid scoping
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Minimum priority to display
    pub min_level: Option<LogLevel>,
    /// Only tags containing this string
    pub tag_contains: Option<String>,
    /// Only messages containing this string
    pub message_contains: Option<String>,
}

impl LogFilter {
    /// Check if the entry passes the filter
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(min) = self.min_level {
            if entry.level < min {
                return false;
            }
        }
        if let Some(ref pattern) = self.tag_contains {
            if !entry.tag.contains(pattern.as_str()) {
                return false;
            }
        }
        if let Some(ref pattern) = self.message_contains {
            if !entry.message.contains(pattern.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Logcat buffer selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogBuffer {
    #[default]
    Main,
    System,
    Radio,
    Events,
    Crash,
    All,
}

impl LogBuffer {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogBuffer::Main => "main",
            LogBuffer::System => "system",
            LogBuffer::Radio => "radio",
            LogBuffer::Events => "events",
            LogBuffer::Crash => "crash",
            LogBuffer::All => "all",
        }
    }
}

impl std::str::FromStr for LogBuffer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(LogBuffer::Main),
            "system" => Ok(LogBuffer::System),
            "radio" => Ok(LogBuffer::Radio),
            "events" => Ok(LogBuffer::Events),
            "crash" => Ok(LogBuffer::Crash),
            "all" => Ok(LogBuffer::All),
            other => Err(format!("unknown log buffer: {other}")),
        }
    }
}

/// Streams parsed records from one device's log
pub struct LogcatReader {
    adb: AdbClient,
    serial: String,
    buffer: LogBuffer,
}

impl LogcatReader {
    pub fn new(adb: AdbClient, serial: impl Into<String>) -> Self {
        Self {
            adb,
            serial: serial.into(),
            buffer: LogBuffer::default(),
        }
    }

    /// Read an alternate buffer instead of `main`
    pub fn with_buffer(mut self, buffer: LogBuffer) -> Self {
        self.buffer = buffer;
        self
    }

    /// Clear the device-side buffer
    pub async fn clear(&self) -> Result<(), LogcatError> {
        self.adb
            .run_for_device(&self.serial, &["logcat", "-b", self.buffer.as_str(), "-c"])
            .await?;
        Ok(())
    }

    /// Spawn `adb logcat` and forward parsed records until its stdout
    /// closes. Channel closure is the disconnect signal; the adb child is
    /// killed when the reader task ends.
    pub fn stream(&self) -> Result<mpsc::Receiver<LogEntry>, LogcatError> {
        let mut child = self
            .adb
            .command()
            .args([
                "-s",
                &self.serial,
                "logcat",
                "-v",
                "threadtime",
                "-b",
                self.buffer.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => return Err(LogcatError::Io(std::io::Error::other("no child stdout"))),
        };

        let (tx, rx) = mpsc::channel(1024);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match LogEntry::parse(&line) {
                    Some(entry) => {
                        if tx.send(entry).await.is_err() {
                            // Receiver hung up; the session is over
                            break;
                        }
                    }
                    None => trace!("skipping unparsed logcat line: {line}"),
                }
            }
            drop(child);
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_threadtime_line() {
        let line = "03-15 10:23:45.123  1234  1302 I ActivityManager: Start proc 8241:com.example.demo/u0a154";
        let entry = LogEntry::parse(line).unwrap();

        assert_eq!(entry.timestamp, "03-15 10:23:45.123");
        assert_eq!(entry.pid, 1234);
        assert_eq!(entry.tid, 1302);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.tag, "ActivityManager");
        assert_eq!(
            entry.message,
            "Start proc 8241:com.example.demo/u0a154"
        );
        assert_eq!(entry.raw, line);
    }

    #[test]
    fn parses_single_space_columns() {
        let entry = LogEntry::parse("03-15 10:23:45.123 99 99 W MyTag: hello").unwrap();
        assert_eq!(entry.pid, 99);
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.tag, "MyTag");
        assert_eq!(entry.message, "hello");
    }

    #[test]
    fn parses_empty_message() {
        let entry = LogEntry::parse("03-15 10:23:45.123  1234  1234 D Watchdog:").unwrap();
        assert_eq!(entry.tag, "Watchdog");
        assert_eq!(entry.message, "");
    }

    #[test]
    fn message_may_contain_colons() {
        let entry =
            LogEntry::parse("03-15 10:23:45.123  1234  1234 E Net: connect 10.0.2.2:8080 failed")
                .unwrap();
        assert_eq!(entry.tag, "Net");
        assert_eq!(entry.message, "connect 10.0.2.2:8080 failed");
    }

    #[test]
    fn rejects_malformed_lines() {
        // Buffer marker: no pid column
        assert!(LogEntry::parse("--------- beginning of main").is_none());
        // Not a priority letter
        assert!(LogEntry::parse("03-15 10:23:45.123  1234  1234 X Tag: msg").is_none());
        // Truncated
        assert!(LogEntry::parse("03-15 10:23:45.123  1234").is_none());
        // Non-numeric pid
        assert!(LogEntry::parse("03-15 10:23:45.123  abcd  1234 I Tag: msg").is_none());
        // Empty
        assert!(LogEntry::parse("").is_none());
    }

    #[test]
    fn filter_by_level_and_tag() {
        let info = LogEntry::parse("03-15 10:00:00.000  1  1 I App: fine").unwrap();
        let error = LogEntry::parse("03-15 10:00:00.000  1  1 E App: broken").unwrap();

        let filter = LogFilter {
            min_level: Some(LogLevel::Warning),
            ..Default::default()
        };
        assert!(!filter.matches(&info));
        assert!(filter.matches(&error));

        let filter = LogFilter {
            tag_contains: Some("App".to_string()),
            message_contains: Some("broken".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&info));
        assert!(filter.matches(&error));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let entry = LogEntry::parse("03-15 10:00:00.000  1  1 V App: x").unwrap();
        assert!(LogFilter::default().matches(&entry));
    }

    #[test]
    fn level_and_buffer_from_str() {
        assert_eq!("w".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("ERROR".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("loud".parse::<LogLevel>().is_err());

        assert_eq!("crash".parse::<LogBuffer>().unwrap(), LogBuffer::Crash);
        assert!("bogus".parse::<LogBuffer>().is_err());
    }
}
