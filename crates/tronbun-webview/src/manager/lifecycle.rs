use std::sync::{Arc, Mutex};

use tracing::debug;
use winit::window::Window;
use wry::WebViewBuilder;

use crate::bridge::BRIDGE_INIT_SCRIPT;
use crate::context_menu::NativeContextMenu;

use super::registry::ScriptRegistry;
use super::types::WebViewConfig;
use super::{Waker, WebViewHost};

impl WebViewHost {
    /// Create the WebView filling `window`.
    ///
    /// `waker` is called after every page event is queued, so the main
    /// loop can drain it promptly.
    pub fn create(
        window: Arc<Window>,
        config: WebViewConfig,
        waker: Waker,
    ) -> Result<Self, wry::Error> {
        let events = Arc::new(Mutex::new(Vec::new()));

        let mut builder = WebViewBuilder::new()
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(true)
            .with_initialization_script(BRIDGE_INIT_SCRIPT);

        // IPC handler: page -> host
        builder = Self::attach_ipc_handler(builder, Arc::clone(&events), Arc::clone(&waker));

        // Page load handler: replays page-scoped state
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events), waker);

        builder = builder.with_html(&config.html);

        let webview = build(builder, &window)?;
        debug!(devtools = config.devtools, "WebView created");

        Ok(Self {
            window,
            webview,
            events,
            scripts: ScriptRegistry::default(),
            context_menu: Box::new(NativeContextMenu::default()),
            limits: config.limits,
            exit_requested: false,
        })
    }
}

#[cfg(not(target_os = "linux"))]
fn build(builder: WebViewBuilder<'_>, window: &Window) -> Result<wry::WebView, wry::Error> {
    builder.build(window)
}

/// On Linux the WebView is a child of the X11 window and is resized by
/// hand (see [`WebViewHost::resize`]).
#[cfg(target_os = "linux")]
fn build(builder: WebViewBuilder<'_>, window: &Window) -> Result<wry::WebView, wry::Error> {
    builder
        .with_bounds(super::full_bounds(window.inner_size()))
        .build_as_child(window)
}
