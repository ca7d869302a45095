//! Command table: the toolkit-facing traits and the handler for every
//! [`Method`].
//!
//! Handlers pull their params through [`Params`] with per-field bounds and
//! defaults, call exactly one toolkit operation, and turn the outcome into
//! a [`Reply`]. They run on the main thread.

use serde::Serialize;
use serde_json::Value;

use crate::codec::{Limits, Reply, Request};
use crate::errors::{CommandError, ToolkitError};
use crate::menu::{parse_menu, MenuItem};
use crate::params::Params;
use crate::router::{Method, Namespace};

// Field bounds, terminator included.
const TITLE_MAX: usize = 512;
const URL_MAX: usize = 1024;
const TOOLTIP_MAX: usize = 512;
const ICON_PATH_MAX: usize = 1024;
const NOTIFICATION_TITLE_MAX: usize = 256;
const NOTIFICATION_BODY_MAX: usize = 1024;
const OPACITY_TEXT_MAX: usize = 32;

// Handler defaults.
const DEFAULT_WIDTH: i32 = 800;
const DEFAULT_HEIGHT: i32 = 600;

// =============================================================================
// TYPES
// =============================================================================

/// The `hints` argument of `set_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    /// Plain resize.
    None,
    /// Set the minimum size.
    Min,
    /// Set the maximum size.
    Max,
    /// Resize and lock.
    Fixed,
    /// Anything else, forwarded as given.
    Other(i32),
}

impl From<i32> for SizeHint {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Min,
            2 => Self::Max,
            3 => Self::Fixed,
            n => Self::Other(n),
        }
    }
}

/// `get_version` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub number: String,
    pub engine: String,
    pub limits: WireLimits,
}

/// Size ceilings advertised to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireLimits {
    pub max_command_length: usize,
    pub max_field_length: usize,
}

impl From<Limits> for WireLimits {
    fn from(limits: Limits) -> Self {
        Self {
            max_command_length: limits.max_command_length,
            max_field_length: limits.max_field_length,
        }
    }
}

// =============================================================================
// TOOLKIT TRAITS
// =============================================================================

/// Webview and bridge operations.
pub trait WebviewOps {
    fn set_title(&mut self, title: &str) -> Result<(), ToolkitError>;
    fn set_size(&mut self, width: i32, height: i32, hint: SizeHint) -> Result<(), ToolkitError>;
    fn navigate(&mut self, url: &str) -> Result<(), ToolkitError>;
    fn set_html(&mut self, html: &str) -> Result<(), ToolkitError>;
    fn eval(&mut self, js: &str) -> Result<(), ToolkitError>;
    /// Run `js` before every page load from now on.
    fn init(&mut self, js: &str) -> Result<(), ToolkitError>;
    fn bind(&mut self, name: &str) -> Result<(), ToolkitError>;
    fn unbind(&mut self, name: &str) -> Result<(), ToolkitError>;
    fn terminate(&mut self) -> Result<(), ToolkitError>;
    /// Native window handle, formatted for the peer.
    fn native_window(&self) -> Result<String, ToolkitError>;
    fn version(&self) -> VersionInfo;
    /// Settle the page promise for bridge request `bridge_id`.
    fn resolve_bridge(
        &mut self,
        bridge_id: &str,
        result: &Value,
        error: Option<&str>,
    ) -> Result<(), ToolkitError>;
}

/// Native window controls.
pub trait WindowOps {
    fn set_transparent(&mut self) -> Result<(), ToolkitError>;
    fn set_opaque(&mut self) -> Result<(), ToolkitError>;
    fn enable_blur(&mut self) -> Result<(), ToolkitError>;
    fn set_decorations(&mut self, decorated: bool) -> Result<(), ToolkitError>;
    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), ToolkitError>;
    fn set_opacity(&mut self, opacity: f64) -> Result<(), ToolkitError>;
    fn set_resizable(&mut self, resizable: bool) -> Result<(), ToolkitError>;
    fn set_position(&mut self, x: i32, y: i32) -> Result<(), ToolkitError>;
    fn center(&mut self) -> Result<(), ToolkitError>;
    fn minimize(&mut self) -> Result<(), ToolkitError>;
    fn maximize(&mut self) -> Result<(), ToolkitError>;
    fn restore(&mut self) -> Result<(), ToolkitError>;
    fn set_visible(&mut self, visible: bool) -> Result<(), ToolkitError>;
    fn set_context_menu(&mut self, items: Vec<MenuItem>) -> Result<(), ToolkitError>;
    fn clear_context_menu(&mut self) -> Result<(), ToolkitError>;
}

/// Tray icon, menu and notifications.
pub trait TrayOps {
    fn set_icon(&mut self, path: &str) -> Result<(), ToolkitError>;
    fn set_tooltip(&mut self, tooltip: &str) -> Result<(), ToolkitError>;
    fn set_menu(&mut self, items: Vec<MenuItem>) -> Result<(), ToolkitError>;
    fn show_notification(&mut self, title: &str, body: &str) -> Result<(), ToolkitError>;
    fn destroy(&mut self) -> Result<(), ToolkitError>;
}

/// What a helper exposes to the command table. Namespaces it returns
/// `None` for answer `Unknown method`.
pub trait CommandTarget {
    fn webview(&mut self) -> Option<&mut dyn WebviewOps> {
        None
    }

    fn window(&mut self) -> Option<&mut dyn WindowOps> {
        None
    }

    fn tray(&mut self) -> Option<&mut dyn TrayOps> {
        None
    }
}

// =============================================================================
// ROUTING
// =============================================================================

/// Run `request` against `target` and produce its reply.
pub fn execute(request: &Request, target: &mut dyn CommandTarget, limits: &Limits) -> Reply {
    let Some(method) = Method::parse(&request.method) else {
        return Reply::error(CommandError::UnknownMethod);
    };
    let params = Params::new(&request.params);

    let reply = match method.namespace() {
        Namespace::Webview | Namespace::Bridge => target
            .webview()
            .map(|webview| webview_command(method, params, webview, limits)),
        Namespace::Window => target
            .window()
            .map(|window| window_command(method, params, window)),
        Namespace::Tray => target.tray().map(|tray| tray_command(method, params, tray)),
    };

    reply.unwrap_or_else(|| Reply::error(CommandError::UnknownMethod))
}

fn ack(result: Result<(), ToolkitError>) -> Reply {
    match result {
        Ok(()) => Reply::Ack,
        Err(e) => {
            tracing::warn!(error = %e, "toolkit call failed");
            Reply::error(CommandError::from(e))
        }
    }
}

fn webview_command(
    method: Method,
    params: Params<'_>,
    webview: &mut dyn WebviewOps,
    limits: &Limits,
) -> Reply {
    let field = limits.max_field_length;
    let content = limits.max_command_length;

    match method {
        Method::SetTitle => ack(webview.set_title(&params.string("title", TITLE_MAX))),
        Method::SetSize => {
            let width = params.int("width", DEFAULT_WIDTH);
            let height = params.int("height", DEFAULT_HEIGHT);
            let hint = SizeHint::from(params.int("hints", 0));
            ack(webview.set_size(width, height, hint))
        }
        Method::Navigate => ack(webview.navigate(&params.string("url", URL_MAX))),
        Method::SetHtml => ack(webview.set_html(&params.string("html", content))),
        Method::Eval => ack(webview.eval(&params.string("js", content))),
        Method::Init => ack(webview.init(&params.string("js", content))),
        Method::Bind => ack(webview.bind(&params.string("name", field))),
        Method::Unbind => ack(webview.unbind(&params.string("name", field))),
        Method::Terminate => ack(webview.terminate()),
        Method::GetWindow => match webview.native_window() {
            Ok(handle) => Reply::Text(handle),
            Err(e) => Reply::error(CommandError::from(e)),
        },
        Method::GetVersion => match serde_json::to_value(webview.version()) {
            Ok(info) => Reply::Json(info),
            Err(e) => Reply::error(CommandError::from(ToolkitError::new(e.to_string()))),
        },
        Method::IpcResponse => {
            let bridge_id = params.string("id", field);
            let result = params.value("result").cloned().unwrap_or(Value::Null);
            let error = params.opt_string("error", content);
            tracing::debug!(bridge_id = %bridge_id, rejected = error.is_some(), "bridge response");
            if let Err(e) = webview.resolve_bridge(&bridge_id, &result, error.as_deref()) {
                tracing::warn!(bridge_id = %bridge_id, error = %e, "failed to settle bridge promise");
            }
            Reply::Json(result)
        }
        _ => Reply::error(CommandError::UnknownMethod),
    }
}

fn window_command(method: Method, params: Params<'_>, window: &mut dyn WindowOps) -> Reply {
    match method {
        Method::SetTransparent => ack(window.set_transparent()),
        Method::SetOpaque => ack(window.set_opaque()),
        Method::EnableBlur => ack(window.enable_blur()),
        Method::RemoveDecorations => ack(window.set_decorations(false)),
        Method::AddDecorations => ack(window.set_decorations(true)),
        Method::SetAlwaysOnTop => ack(window.set_always_on_top(params.flag("on_top", true))),
        Method::SetOpacity => {
            let raw = match params.value("opacity") {
                Some(Value::String(s)) if s.len() >= OPACITY_TEXT_MAX => 1.0,
                _ => params.float_lenient("opacity", 1.0),
            };
            ack(window.set_opacity(raw.clamp(0.0, 1.0)))
        }
        Method::SetResizable => ack(window.set_resizable(params.flag("resizable", true))),
        Method::SetPosition => ack(window.set_position(params.int("x", 0), params.int("y", 0))),
        Method::Center => ack(window.center()),
        Method::Minimize => ack(window.minimize()),
        Method::Maximize => ack(window.maximize()),
        Method::Restore => ack(window.restore()),
        Method::Hide => ack(window.set_visible(false)),
        Method::Show => ack(window.set_visible(true)),
        Method::SetContextMenu => match parse_menu(params.value("menu")) {
            Ok(items) => ack(window.set_context_menu(items)),
            Err(e) => Reply::error(e),
        },
        Method::ClearContextMenu => ack(window.clear_context_menu()),
        _ => Reply::error(CommandError::UnknownMethod),
    }
}

fn tray_command(method: Method, params: Params<'_>, tray: &mut dyn TrayOps) -> Reply {
    match method {
        Method::TraySetIcon => {
            let path = params.string("icon", ICON_PATH_MAX);
            if let Err(e) = tray.set_icon(&path) {
                tracing::warn!(path = %path, error = %e, "keeping current tray icon");
            }
            Reply::Ack
        }
        Method::TraySetTooltip => {
            Reply::Bool(report(tray.set_tooltip(&params.string("tooltip", TOOLTIP_MAX))))
        }
        Method::TraySetMenu => match parse_menu(params.value("menu")) {
            Ok(items) if !items.is_empty() => Reply::Bool(report(tray.set_menu(items))),
            Ok(_) => Reply::error(CommandError::InvalidMenu),
            Err(e) => Reply::error(e),
        },
        Method::TrayShowNotification => {
            let title = params.string("title", NOTIFICATION_TITLE_MAX);
            let body = params.string("body", NOTIFICATION_BODY_MAX);
            Reply::Bool(report(tray.show_notification(&title, &body)))
        }
        Method::TrayDestroy => ack(tray.destroy()),
        _ => Reply::error(CommandError::UnknownMethod),
    }
}

fn report(result: Result<(), ToolkitError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "tray call failed");
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
