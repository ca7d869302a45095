use serde_json::Value;
use tracing::{debug, info};
use tronbun_ipc::{MenuItem, SizeHint, ToolkitError, VersionInfo, WebviewOps, WindowOps};
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition};
use winit::window::WindowLevel;
use wry::raw_window_handle::HasWindowHandle;

use crate::bridge::{self, CONTEXT_MENU_CLEAR_SCRIPT, CONTEXT_MENU_SCRIPT};

use super::native::format_handle;
use super::WebViewHost;

fn toolkit(e: impl std::fmt::Display) -> ToolkitError {
    ToolkitError::new(e.to_string())
}

fn parse_version(part: &str) -> u32 {
    part.parse().unwrap_or(0)
}

// =============================================================================
// WEBVIEW OPERATIONS
// =============================================================================

impl WebviewOps for WebViewHost {
    fn set_title(&mut self, title: &str) -> Result<(), ToolkitError> {
        self.window.set_title(title);
        Ok(())
    }

    fn set_size(&mut self, width: i32, height: i32, hint: SizeHint) -> Result<(), ToolkitError> {
        let size = LogicalSize::new(width.max(0) as f64, height.max(0) as f64);
        match hint {
            SizeHint::Min => self.window.set_min_inner_size(Some(size)),
            SizeHint::Max => self.window.set_max_inner_size(Some(size)),
            SizeHint::Fixed => {
                self.window.set_resizable(false);
                self.window.set_min_inner_size(Some(size));
                self.window.set_max_inner_size(Some(size));
                let _ = self.window.request_inner_size(size);
            }
            SizeHint::None | SizeHint::Other(_) => {
                self.window.set_resizable(true);
                let _ = self.window.request_inner_size(size);
            }
        }
        debug!(width, height, ?hint, "window size set");
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), ToolkitError> {
        info!(url = %url, "navigating");
        self.webview.load_url(url).map_err(toolkit)
    }

    fn set_html(&mut self, html: &str) -> Result<(), ToolkitError> {
        self.webview.load_html(html).map_err(toolkit)
    }

    fn eval(&mut self, js: &str) -> Result<(), ToolkitError> {
        self.run_script(js)
    }

    fn init(&mut self, js: &str) -> Result<(), ToolkitError> {
        if self.scripts.add_init(js) {
            self.run_script(js)?;
        }
        Ok(())
    }

    fn bind(&mut self, name: &str) -> Result<(), ToolkitError> {
        if !self.scripts.bind(name) {
            debug!(name = %name, "already bound");
        }
        self.run_script(&bridge::js_bind(name))
    }

    fn unbind(&mut self, name: &str) -> Result<(), ToolkitError> {
        if !self.scripts.unbind(name) {
            debug!(name = %name, "unbind of unknown function");
        }
        self.run_script(&bridge::js_unbind(name))
    }

    fn terminate(&mut self) -> Result<(), ToolkitError> {
        info!("terminate requested");
        self.exit_requested = true;
        Ok(())
    }

    fn native_window(&self) -> Result<String, ToolkitError> {
        let handle = self.window.window_handle().map_err(toolkit)?;
        format_handle(handle.as_raw())
            .ok_or_else(|| ToolkitError::new("unsupported window handle"))
    }

    fn version(&self) -> VersionInfo {
        VersionInfo {
            major: parse_version(env!("CARGO_PKG_VERSION_MAJOR")),
            minor: parse_version(env!("CARGO_PKG_VERSION_MINOR")),
            patch: parse_version(env!("CARGO_PKG_VERSION_PATCH")),
            number: env!("CARGO_PKG_VERSION").to_string(),
            engine: wry::webview_version().unwrap_or_else(|_| "unknown".to_string()),
            limits: self.limits.into(),
        }
    }

    fn resolve_bridge(
        &mut self,
        bridge_id: &str,
        result: &Value,
        error: Option<&str>,
    ) -> Result<(), ToolkitError> {
        let js = match error {
            Some(message) => bridge::js_return(bridge_id, 1, &Value::from(message)),
            None => bridge::js_return(bridge_id, 0, result),
        };
        self.run_script(&js)
    }
}

// =============================================================================
// WINDOW OPERATIONS
// =============================================================================

impl WindowOps for WebViewHost {
    fn set_transparent(&mut self) -> Result<(), ToolkitError> {
        self.window.set_transparent(true);
        self.webview
            .set_background_color((0, 0, 0, 0))
            .map_err(toolkit)?;
        self.scripts.set_transparent(true);
        self.run_script(&bridge::js_set_transparent(true))
    }

    fn set_opaque(&mut self) -> Result<(), ToolkitError> {
        self.window.set_transparent(false);
        self.webview
            .set_background_color((255, 255, 255, 255))
            .map_err(toolkit)?;
        self.scripts.set_transparent(false);
        self.run_script(&bridge::js_set_transparent(false))
    }

    fn enable_blur(&mut self) -> Result<(), ToolkitError> {
        self.window.set_blur(true);
        Ok(())
    }

    fn set_decorations(&mut self, decorated: bool) -> Result<(), ToolkitError> {
        self.window.set_decorations(decorated);
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), ToolkitError> {
        let level = if on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.window.set_window_level(level);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<(), ToolkitError> {
        self.scripts.set_opacity(opacity);
        self.run_script(&bridge::js_set_opacity(opacity))
    }

    fn set_resizable(&mut self, resizable: bool) -> Result<(), ToolkitError> {
        self.window.set_resizable(resizable);
        Ok(())
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<(), ToolkitError> {
        self.window
            .set_outer_position(LogicalPosition::new(x as f64, y as f64));
        Ok(())
    }

    fn center(&mut self) -> Result<(), ToolkitError> {
        let monitor = self
            .window
            .current_monitor()
            .ok_or_else(|| ToolkitError::new("no monitor for window"))?;
        let area = monitor.size();
        let origin = monitor.position();
        let outer = self.window.outer_size();
        let x = origin.x + (area.width as i32 - outer.width as i32) / 2;
        let y = origin.y + (area.height as i32 - outer.height as i32) / 2;
        self.window.set_outer_position(PhysicalPosition::new(x, y));
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), ToolkitError> {
        self.window.set_minimized(true);
        Ok(())
    }

    fn maximize(&mut self) -> Result<(), ToolkitError> {
        self.window.set_maximized(true);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), ToolkitError> {
        self.window.set_minimized(false);
        self.window.set_maximized(false);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), ToolkitError> {
        self.window.set_visible(visible);
        Ok(())
    }

    fn set_context_menu(&mut self, items: Vec<MenuItem>) -> Result<(), ToolkitError> {
        self.context_menu.install(&items)?;
        self.scripts.set_context_menu(true);
        self.run_script(CONTEXT_MENU_SCRIPT)
    }

    fn clear_context_menu(&mut self) -> Result<(), ToolkitError> {
        self.context_menu.clear();
        self.scripts.set_context_menu(false);
        self.run_script(CONTEXT_MENU_CLEAR_SCRIPT)
    }
}
