//! The helper's single WebView and its window.
//!
//! `WebViewHost` owns the `wry::WebView` and the `winit` window it fills,
//! implements the broker's [`WebviewOps`] and [`WindowOps`], and turns
//! page messages into wire events.
//!
//! [`WebviewOps`]: tronbun_ipc::WebviewOps
//! [`WindowOps`]: tronbun_ipc::WindowOps

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};
use tronbun_ipc::{CommandTarget, Event, FrameWriter, Limits, ToolkitError, WebviewOps, WindowOps};
use winit::window::Window;
use wry::WebView;

use crate::bridge::{js_return, BIND_ACK};
use crate::context_menu::ContextMenuHost;
use crate::events::{request_value, PageLoadState, PageMessage, WebViewEvent};

mod handlers;
mod lifecycle;
mod native;
mod ops;
mod registry;
mod types;

pub use native::format_handle;
pub use registry::ScriptRegistry;
pub use types::WebViewConfig;

/// Called from WebView callbacks after an event is queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct WebViewHost {
    window: Arc<Window>,
    webview: WebView,
    /// Event sink; callbacks push here for the main loop to drain.
    events: Arc<Mutex<Vec<WebViewEvent>>>,
    scripts: ScriptRegistry,
    context_menu: Box<dyn ContextMenuHost>,
    limits: Limits,
    exit_requested: bool,
}

impl WebViewHost {
    /// Set by `terminate`; the main loop exits when it sees it.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Handle one drained event, writing any resulting frames to `writer`.
    pub fn handle_event(&mut self, event: WebViewEvent, writer: &FrameWriter) {
        match event {
            WebViewEvent::PageLoad {
                state: PageLoadState::Started,
                ..
            } => self.scripts.page_started(),
            WebViewEvent::PageLoad {
                state: PageLoadState::Finished,
                url,
            } => {
                let script = self.scripts.page_finished();
                if !script.is_empty() {
                    debug!(url = %url, "replaying page scripts");
                    self.eval_logged(&script);
                }
            }
            WebViewEvent::Message(message) => self.handle_message(message, writer),
        }
    }

    fn handle_message(&mut self, message: PageMessage, writer: &FrameWriter) {
        match message {
            PageMessage::Invoke { seq, req } => {
                debug!(seq = %seq, "bridge call");
                writer.emit(&Event::ipc_call(seq, request_value(req)));
            }
            PageMessage::Bind { name, seq, req } => {
                if !self.scripts.is_bound(&name) {
                    warn!(name = %name, "call to unbound function");
                    self.eval_logged(&js_return(&seq, 1, &Value::from("function is not bound")));
                    return;
                }
                debug!(name = %name, seq = %seq, "bound function called");
                writer.emit(&Event::bind_callback(name, seq.clone(), req));
                let ack: Value = serde_json::from_str(BIND_ACK).unwrap_or(Value::Null);
                self.eval_logged(&js_return(&seq, 0, &ack));
            }
            PageMessage::ContextMenu { x, y } => {
                match self.context_menu.popup(&*self.window, x, y) {
                    Ok(true) => {}
                    Ok(false) => debug!("right-click with no context menu installed"),
                    Err(e) => warn!(error = %e, "failed to show context menu"),
                }
            }
        }
    }

    /// Keep the WebView filling the window. Only needed where it is a
    /// child view.
    pub fn resize(&self, size: winit::dpi::PhysicalSize<u32>) {
        #[cfg(target_os = "linux")]
        {
            if let Err(e) = self.webview.set_bounds(full_bounds(size)) {
                warn!(error = %e, "failed to resize WebView");
            }
        }
        #[cfg(not(target_os = "linux"))]
        let _ = size;
    }

    fn run_script(&self, js: &str) -> Result<(), ToolkitError> {
        self.webview
            .evaluate_script(js)
            .map_err(|e| ToolkitError::new(e.to_string()))
    }

    fn eval_logged(&self, js: &str) {
        if let Err(e) = self.run_script(js) {
            warn!(error = %e, "script evaluation failed");
        }
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn full_bounds(size: winit::dpi::PhysicalSize<u32>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::PhysicalPosition::new(0, 0).into(),
        size: wry::dpi::PhysicalSize::new(size.width, size.height).into(),
    }
}

impl CommandTarget for WebViewHost {
    fn webview(&mut self) -> Option<&mut dyn WebviewOps> {
        Some(self)
    }

    fn window(&mut self) -> Option<&mut dyn WindowOps> {
        Some(self)
    }
}
