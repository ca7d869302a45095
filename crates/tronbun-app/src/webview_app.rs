//! `ApplicationHandler` for the webview helper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tronbun_common::TronbunError;
use tronbun_config::HelperConfig;
use tronbun_ipc::{Broker, DispatchRecord, Event};
use tronbun_webview::{WebViewConfig, WebViewHost};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::host_loop::{self, HostEvent, HostProxy, DEFAULT_PUMP_INTERVAL};
use crate::HelperApp;

pub struct WebviewApp {
    config: HelperConfig,
    broker: Broker,
    proxy: HostProxy,
    reader_done: Arc<AtomicBool>,
    host: Option<WebViewHost>,
    /// Records that arrived before the window existed.
    pending: Vec<DispatchRecord>,
    failed: bool,
}

impl WebviewApp {
    pub fn new(
        config: HelperConfig,
        broker: Broker,
        proxy: HostProxy,
        reader_done: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            broker,
            proxy,
            reader_done,
            host: None,
            pending: Vec::new(),
            failed: false,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<WebViewHost, TronbunError> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(&window_config.title)
            .with_inner_size(LogicalSize::new(
                window_config.width as f64,
                window_config.height as f64,
            ));
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| TronbunError::Other(format!("window creation failed: {e}")))?;

        let host = WebViewHost::create(
            Arc::new(window),
            WebViewConfig::from_helper(&self.config),
            self.proxy.waker(),
        )
        .map_err(|e| TronbunError::WebView(e.to_string()))?;

        tracing::info!(
            title = %window_config.title,
            width = window_config.width,
            height = window_config.height,
            "webview window ready"
        );
        Ok(host)
    }

    fn exit_if_requested(&self, event_loop: &ActiveEventLoop) {
        let terminated = self.host.as_ref().is_some_and(WebViewHost::exit_requested);
        if terminated || self.reader_done.load(Ordering::SeqCst) {
            event_loop.exit();
        }
    }
}

impl HelperApp for WebviewApp {
    fn failed(&self) -> bool {
        self.failed
    }
}

impl ApplicationHandler<HostEvent> for WebviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        match self.initialize(event_loop) {
            Ok(mut host) => {
                host_loop::drain_pending(&mut self.pending, &self.broker, &mut host);
                self.host = Some(host);
                self.exit_if_requested(event_loop);
            }
            Err(e) => {
                tracing::error!("failed to start webview: {e}");
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::Dispatch(record) => match self.host.as_mut() {
                Some(host) => self.broker.execute(record, host),
                None => self.pending.push(record),
            },
            HostEvent::PageEvents => {
                if let Some(host) = self.host.as_mut() {
                    for page_event in host.drain_events() {
                        host.handle_event(page_event, self.broker.writer());
                    }
                }
            }
            HostEvent::Menu(menu_event) => {
                tracing::debug!(id = %menu_event.id.0, "context menu item selected");
                self.broker
                    .emit(&Event::context_menu_click(menu_event.id.0));
            }
            HostEvent::Shutdown => {
                tracing::info!("stdin closed, exiting");
                event_loop.exit();
                return;
            }
        }
        self.exit_if_requested(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(host) = &self.host {
                    host.resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_if_requested(event_loop);
        host_loop::schedule(event_loop, DEFAULT_PUMP_INTERVAL);
    }
}
