//! Native right-click menus for the webview window.
//!
//! The page-side script ([`CONTEXT_MENU_SCRIPT`]) swallows `contextmenu`
//! events and posts their coordinates; the host pops the installed menu
//! there. Selections arrive as `muda::MenuEvent`s carrying the peer's item
//! id, which the main loop turns into `context_menu_click` events.
//!
//! [`CONTEXT_MENU_SCRIPT`]: crate::bridge::CONTEXT_MENU_SCRIPT

use muda::dpi::{LogicalPosition, Position};
use tronbun_ipc::{MenuItem, ToolkitError};
use tronbun_platform::build_menu;
use wry::raw_window_handle::{HasWindowHandle, RawWindowHandle};

pub trait ContextMenuHost {
    /// Replace the installed menu.
    fn install(&mut self, items: &[MenuItem]) -> Result<(), ToolkitError>;

    fn clear(&mut self);

    /// Show the installed menu at client coordinates `(x, y)` of `window`.
    /// Returns `false` when nothing is installed.
    fn popup(&self, window: &dyn HasWindowHandle, x: f64, y: f64) -> Result<bool, ToolkitError>;
}

/// `muda`-backed implementation.
#[derive(Default)]
pub struct NativeContextMenu {
    menu: Option<muda::Menu>,
}

impl ContextMenuHost for NativeContextMenu {
    fn install(&mut self, items: &[MenuItem]) -> Result<(), ToolkitError> {
        let menu = build_menu(items).map_err(|e| ToolkitError::new(e.to_string()))?;
        tracing::debug!(items = items.len(), "context menu installed");
        self.menu = Some(menu);
        Ok(())
    }

    fn clear(&mut self) {
        self.menu = None;
    }

    fn popup(&self, window: &dyn HasWindowHandle, x: f64, y: f64) -> Result<bool, ToolkitError> {
        let Some(menu) = &self.menu else {
            return Ok(false);
        };
        let handle = window
            .window_handle()
            .map_err(|e| ToolkitError::new(e.to_string()))?;
        let position = Some(Position::Logical(LogicalPosition::new(x, y)));
        show(menu, handle.as_raw(), position)?;
        Ok(true)
    }
}

#[cfg(target_os = "windows")]
fn show(menu: &muda::Menu, raw: RawWindowHandle, position: Option<Position>) -> Result<(), ToolkitError> {
    use muda::ContextMenu;
    match raw {
        RawWindowHandle::Win32(h) => {
            // SAFETY: the handle comes from a live window owned by the caller.
            unsafe { menu.show_context_menu_for_hwnd(h.hwnd.get(), position) };
            Ok(())
        }
        _ => Err(ToolkitError::new("unsupported window handle")),
    }
}

#[cfg(target_os = "macos")]
fn show(menu: &muda::Menu, raw: RawWindowHandle, position: Option<Position>) -> Result<(), ToolkitError> {
    use muda::ContextMenu;
    match raw {
        RawWindowHandle::AppKit(h) => {
            // SAFETY: the view comes from a live window owned by the caller.
            unsafe { menu.show_context_menu_for_nsview(h.ns_view.as_ptr() as _, position) };
            Ok(())
        }
        _ => Err(ToolkitError::new("unsupported window handle")),
    }
}

#[cfg(target_os = "linux")]
fn show(menu: &muda::Menu, _raw: RawWindowHandle, _position: Option<Position>) -> Result<(), ToolkitError> {
    use gtk::prelude::*;
    use muda::ContextMenu;
    // winit windows are not GTK windows; pop up at the pointer instead.
    let gtk_menu = menu.gtk_context_menu();
    gtk_menu.popup_at_pointer(None);
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn show(_menu: &muda::Menu, _raw: RawWindowHandle, _position: Option<Position>) -> Result<(), ToolkitError> {
    Err(ToolkitError::new("context menus are not supported on this platform"))
}

// =============================================================================
// TESTS
// =============================================================================
