//! `ApplicationHandler` for the tray helper. It has no windows; the loop
//! exists for the tray icon, its menus and the GTK pump.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tray_icon::TrayIconEvent;
use tronbun_config::HelperConfig;
use tronbun_ipc::{Broker, DispatchRecord, Event};
use tronbun_platform::TrayHost;
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::host_loop::{self, HostEvent};
use crate::HelperApp;

pub struct TrayApp {
    config: HelperConfig,
    broker: Broker,
    reader_done: Arc<AtomicBool>,
    host: Option<TrayHost>,
    /// Records that arrived before the tray icon existed.
    pending: Vec<DispatchRecord>,
    failed: bool,
}

impl TrayApp {
    pub fn new(config: HelperConfig, broker: Broker, reader_done: Arc<AtomicBool>) -> Self {
        // Clicks on the icon itself only open the menu.
        TrayIconEvent::set_event_handler(Some(|event: TrayIconEvent| {
            tracing::trace!(?event, "tray icon event");
        }));

        Self {
            config,
            broker,
            reader_done,
            host: None,
            pending: Vec::new(),
            failed: false,
        }
    }

    fn exit_if_requested(&self, event_loop: &ActiveEventLoop) {
        let destroyed = self.host.as_ref().is_some_and(TrayHost::exit_requested);
        if destroyed || self.reader_done.load(Ordering::SeqCst) {
            event_loop.exit();
        }
    }
}

impl HelperApp for TrayApp {
    fn failed(&self) -> bool {
        self.failed
    }
}

impl ApplicationHandler<HostEvent> for TrayApp {
    // The tray must be created once the loop is running (macOS).
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if cause != StartCause::Init || self.host.is_some() {
            return;
        }

        match TrayHost::new(&self.config.tray.tooltip) {
            Ok(mut host) => {
                host_loop::drain_pending(&mut self.pending, &self.broker, &mut host);
                self.host = Some(host);
                self.exit_if_requested(event_loop);
            }
            Err(e) => {
                tracing::error!("failed to create tray icon: {e}");
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::Dispatch(record) => match self.host.as_mut() {
                Some(host) => self.broker.execute(record, host),
                None => self.pending.push(record),
            },
            HostEvent::Menu(menu_event) => {
                tracing::debug!(id = %menu_event.id.0, "tray menu item selected");
                self.broker.emit(&Event::menu_click(menu_event.id.0));
            }
            HostEvent::PageEvents => {}
            HostEvent::Shutdown => {
                tracing::info!("stdin closed, exiting");
                event_loop.exit();
                return;
            }
        }
        self.exit_if_requested(event_loop);
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_if_requested(event_loop);
        host_loop::schedule(event_loop, self.config.tray.poll_interval());
    }
}
