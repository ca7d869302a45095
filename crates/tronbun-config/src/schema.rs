//! Config types. All sections use `#[serde(default)]` so partial files work.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest accepted frame, in bytes, including the terminating NUL the
/// peer-side library budgets for. A line of `max_command_length - 1` bytes
/// is the longest one accepted.
pub const DEFAULT_MAX_COMMAND_LENGTH: usize = 32768;

/// Field ceiling for `method` and `id` (same convention: 255 usable bytes).
pub const DEFAULT_MAX_FIELD_LENGTH: usize = 256;

pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 1000;

/// Root config for both helper binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub ipc: IpcConfig,
    pub window: WindowConfig,
    pub tray: TrayConfig,
}

/// Wire limits and the main-thread dispatch timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    pub max_command_length: usize,
    pub max_field_length: usize,
    pub dispatch_timeout_ms: u64,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            max_command_length: DEFAULT_MAX_COMMAND_LENGTH,
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
            dispatch_timeout_ms: DEFAULT_DISPATCH_TIMEOUT_MS,
        }
    }
}

impl IpcConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

/// Initial state of the webview helper's window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Always on in debug builds.
    pub devtools: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tronbun default title".into(),
            width: 800,
            height: 600,
            devtools: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    pub tooltip: String,
    /// Main-loop wake-up cadence for the tray helper.
    pub poll_interval_ms: u64,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            tooltip: "Tronbun Tray".into(),
            poll_interval_ms: 10,
        }
    }
}

impl TrayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// Tests
// =============================================================================
