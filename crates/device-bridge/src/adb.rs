//! ADB (Android Debug Bridge) Client
//!
//! Runs the adb executable and parses what it prints.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::device::{Device, DeviceKind, DeviceState};

/// ADB errors
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("adb not found; install platform-tools or set ANDROID_HOME")]
    NotFound,
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("adb command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// ADB Client
#[derive(Debug, Clone)]
pub struct AdbClient {
    adb_path: PathBuf,
}

impl AdbClient {
    /// Locate adb: PATH first, then platform-tools under
    /// ANDROID_HOME/ANDROID_SDK_ROOT.
    pub fn discover() -> Result<Self, AdbError> {
        if let Ok(path) = which::which("adb") {
            return Ok(Self { adb_path: path });
        }
        for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
            if let Ok(root) = std::env::var(var) {
                let candidate = PathBuf::from(root)
                    .join("platform-tools")
                    .join(if cfg!(windows) { "adb.exe" } else { "adb" });
                if candidate.exists() {
                    return Ok(Self { adb_path: candidate });
                }
            }
        }
        Err(AdbError::NotFound)
    }

    /// Use a specific adb executable
    pub fn with_path(adb_path: PathBuf) -> Self {
        Self { adb_path }
    }

    /// Pre-seeded command for callers that manage the child themselves
    /// (streaming).
    pub fn command(&self) -> Command {
        Command::new(&self.adb_path)
    }

    /// Run an adb command and capture stdout
    pub async fn run(&self, args: &[&str]) -> Result<String, AdbError> {
        debug!("adb {:?}", args);

        let output = self.command().args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("device") && stderr.contains("not found") {
                return Err(AdbError::DeviceNotFound(stderr));
            }
            return Err(AdbError::CommandFailed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run an adb command against a specific device
    pub async fn run_for_device(&self, serial: &str, args: &[&str]) -> Result<String, AdbError> {
        let mut full_args = vec!["-s", serial];
        full_args.extend(args);
        self.run(&full_args).await
    }

    /// Run a shell command on the device
    pub async fn shell(&self, serial: &str, command: &str) -> Result<String, AdbError> {
        self.run_for_device(serial, &["shell", command]).await
    }

    /// List connected devices
    pub async fn list_devices(&self) -> Result<Vec<Device>, AdbError> {
        let output = self.run(&["devices", "-l"]).await?;
        Ok(parse_devices(&output))
    }
}

/// Parse `adb devices -l` output
fn parse_devices(output: &str) -> Vec<Device> {
    let mut devices = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("List of devices")
            || line.starts_with('*')
            || line.contains("daemon")
        {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let serial = parts[0].to_string();
        let state = DeviceState::from_adb(parts[1]);

        let mut model = None;
        let mut product = None;
        for part in parts.iter().skip(2) {
            if let Some(value) = part.strip_prefix("model:") {
                model = Some(value.to_string());
            } else if let Some(value) = part.strip_prefix("product:") {
                product = Some(value.to_string());
            }
        }

        let kind = if serial.starts_with("emulator-") {
            DeviceKind::Emulator
        } else {
            DeviceKind::Physical
        };

        devices.push(Device {
            serial,
            state,
            kind,
            model,
            product,
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICES_OUTPUT: &str = "\
List of devices attached
emulator-5554          device product:sdk_gphone64_x86_64 model:sdk_gphone64_x86_64 device:emu64x transport_id:1
R58M123456X            unauthorized transport_id:2

";

    #[test]
    fn parses_device_listing() {
        let devices = parse_devices(DEVICES_OUTPUT);
        assert_eq!(devices.len(), 2);

        assert_eq!(devices[0].serial, "emulator-5554");
        assert_eq!(devices[0].state, DeviceState::Online);
        assert_eq!(devices[0].kind, DeviceKind::Emulator);
        assert_eq!(devices[0].model.as_deref(), Some("sdk_gphone64_x86_64"));
        assert_eq!(devices[0].product.as_deref(), Some("sdk_gphone64_x86_64"));

        assert_eq!(devices[1].serial, "R58M123456X");
        assert_eq!(devices[1].state, DeviceState::Unauthorized);
        assert_eq!(devices[1].kind, DeviceKind::Physical);
        assert!(devices[1].model.is_none());
    }

    #[test]
    fn skips_daemon_chatter() {
        let output = "\
* daemon not running; starting now at tcp:5037
* daemon started successfully
List of devices attached
0123456789ABCDEF       device
";
        let devices = parse_devices(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "0123456789ABCDEF");
    }

    #[test]
    fn empty_listing_yields_no_devices() {
        assert!(parse_devices("List of devices attached\n\n").is_empty());
    }
}
