//! Main-loop integration for the GTK-backed Linux toolkits.
//!
//! wry, tray-icon and muda all sit on GTK on Linux, and winit does not
//! drive GTK. The helpers call [`init`] once on the main thread and
//! [`pump`] on every loop iteration, waking at least every
//! `poll_interval` so GTK work is never starved. Elsewhere both are no-ops.

use tronbun_common::PlatformError;

/// Whether the main loop must wake on a timer to pump GTK.
pub const NEEDS_POLLING: bool = cfg!(target_os = "linux");

#[cfg(target_os = "linux")]
pub fn init() -> Result<(), PlatformError> {
    gtk::init().map_err(|e| PlatformError::NotSupported(format!("gtk init failed: {e}")))
}

#[cfg(target_os = "linux")]
pub fn pump() {
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn init() -> Result<(), PlatformError> {
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pump() {}
