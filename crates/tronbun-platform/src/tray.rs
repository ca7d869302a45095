//! The tray helper's native surface.

use std::path::Path;

use tray_icon::{TrayIcon, TrayIconBuilder};
use tronbun_common::PlatformError;
use tronbun_ipc::{CommandTarget, MenuItem, ToolkitError, TrayOps};

use crate::icon::{default_icon, load_png, DEFAULT_ICON_SIZE};
use crate::menu::build_menu;
use crate::notifications::notify;

/// Owns the tray icon. Must live on the main thread.
pub struct TrayHost {
    icon: Option<TrayIcon>,
    exit_requested: bool,
}

impl TrayHost {
    /// Create the tray icon with the generated default image and `tooltip`.
    ///
    /// The menu, once set, opens on left click as well as right click.
    pub fn new(tooltip: &str) -> Result<Self, PlatformError> {
        let icon = default_icon(DEFAULT_ICON_SIZE).into_tray_icon()?;
        let tray = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(tooltip)
            .build()
            .map_err(|e| PlatformError::TrayError(e.to_string()))?;

        tracing::info!(tooltip, "tray icon created");
        Ok(Self {
            icon: Some(tray),
            exit_requested: false,
        })
    }

    /// Set by `tray_destroy`; the main loop exits when it sees it.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn live_icon(&self) -> Result<&TrayIcon, ToolkitError> {
        self.icon
            .as_ref()
            .ok_or_else(|| ToolkitError::new("tray destroyed"))
    }
}

fn toolkit(err: impl std::fmt::Display) -> ToolkitError {
    ToolkitError::new(err.to_string())
}

impl TrayOps for TrayHost {
    fn set_icon(&mut self, path: &str) -> Result<(), ToolkitError> {
        let image = load_png(Path::new(path)).map_err(toolkit)?;
        let icon = image.into_tray_icon().map_err(toolkit)?;
        self.live_icon()?.set_icon(Some(icon)).map_err(toolkit)
    }

    fn set_tooltip(&mut self, tooltip: &str) -> Result<(), ToolkitError> {
        self.live_icon()?.set_tooltip(Some(tooltip)).map_err(toolkit)
    }

    fn set_menu(&mut self, items: Vec<MenuItem>) -> Result<(), ToolkitError> {
        let menu = build_menu(&items).map_err(toolkit)?;
        self.live_icon()?.set_menu(Some(Box::new(menu)));
        tracing::debug!(items = items.len(), "tray menu installed");
        Ok(())
    }

    fn show_notification(&mut self, title: &str, body: &str) -> Result<(), ToolkitError> {
        notify(title, body).map_err(toolkit)
    }

    fn destroy(&mut self) -> Result<(), ToolkitError> {
        if let Some(tray) = self.icon.take() {
            if let Err(e) = tray.set_visible(false) {
                tracing::warn!(error = %e, "failed to hide tray icon");
            }
        }
        self.exit_requested = true;
        tracing::info!("tray destroyed");
        Ok(())
    }
}

impl CommandTarget for TrayHost {
    fn tray(&mut self) -> Option<&mut dyn TrayOps> {
        Some(self)
    }
}
