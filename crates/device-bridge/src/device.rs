//! Device Types and State
//!
//! Represents attached Android devices (physical and emulated).

use serde::{Deserialize, Serialize};

/// Device state as reported by `adb devices`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    /// Device is online and ready
    Online,
    /// Device is offline
    Offline,
    /// Device is not authorized (accept the prompt on the device)
    Unauthorized,
    /// Any other state (bootloader, recovery, ...)
    Unknown,
}

impl DeviceState {
    pub fn from_adb(state: &str) -> Self {
        match state {
            "device" => DeviceState::Online,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            _ => DeviceState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Online => "online",
            DeviceState::Offline => "offline",
            DeviceState::Unauthorized => "unauthorized",
            DeviceState::Unknown => "unknown",
        }
    }
}

/// Device kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Physical device connected via USB/WiFi
    Physical,
    /// Android emulator
    Emulator,
}

/// One attached device, identified by serial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device serial number
    pub serial: String,
    /// Device state
    pub state: DeviceState,
    /// Device kind
    pub kind: DeviceKind,
    /// Device model (e.g. "Pixel_7"), when `adb devices -l` reports one
    pub model: Option<String>,
    /// Device product name
    pub product: Option<String>,
}

impl Device {
    /// Check if the device is online and usable
    pub fn is_usable(&self) -> bool {
        self.state == DeviceState::Online
    }

    /// Check if this is an emulator
    pub fn is_emulator(&self) -> bool {
        self.kind == DeviceKind::Emulator
    }

    /// Human-friendly name for prompts and status lines
    pub fn display_name(&self) -> String {
        match &self.model {
            Some(model) => format!("{} ({})", model.replace('_', " "), self.serial),
            None => self.serial.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mapping() {
        assert_eq!(DeviceState::from_adb("device"), DeviceState::Online);
        assert_eq!(DeviceState::from_adb("unauthorized"), DeviceState::Unauthorized);
        assert_eq!(DeviceState::from_adb("recovery"), DeviceState::Unknown);
    }

    #[test]
    fn display_name_prefers_model() {
        let device = Device {
            serial: "emulator-5554".to_string(),
            state: DeviceState::Online,
            kind: DeviceKind::Emulator,
            model: Some("sdk_gphone64_x86_64".to_string()),
            product: None,
        };
        assert_eq!(device.display_name(), "sdk gphone64 x86 64 (emulator-5554)");
        assert!(device.is_emulator());
    }
}
