//! Desktop notifications for `tray_show_notification`.
//!
//! macOS goes through `osascript`, Linux through libnotify's
//! `notify-send`. Other targets only log.

use std::process::Command;

use tronbun_common::PlatformError;
use tracing::{debug, info};

pub fn notify(title: &str, body: &str) -> Result<(), PlatformError> {
    match notifier_command(title, body) {
        Some(command) => run_notifier(command),
        None => {
            info!(title, body_len = body.len(), "notifications unsupported here, logged only");
            Ok(())
        }
    }
}

#[cfg(target_os = "macos")]
fn notifier_command(title: &str, body: &str) -> Option<Command> {
    let mut command = Command::new("osascript");
    command.arg("-e").arg(applescript(title, body));
    Some(command)
}

#[cfg(target_os = "linux")]
fn notifier_command(title: &str, body: &str) -> Option<Command> {
    // Plain argv; nothing is shell-interpreted.
    let mut command = Command::new("notify-send");
    command.args(["--app-name=Tronbun", "--", title, body]);
    Some(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn notifier_command(_title: &str, _body: &str) -> Option<Command> {
    None
}

fn run_notifier(mut command: Command) -> Result<(), PlatformError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|e| PlatformError::NotificationError(format!("failed to run {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlatformError::NotificationError(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    debug!(%program, "notification shown");
    Ok(())
}

/// `display notification` script with both strings quoted for AppleScript.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript(title: &str, body: &str) -> String {
    fn quote(text: &str) -> String {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }
    format!("display notification {} with title {}", quote(body), quote(title))
}
