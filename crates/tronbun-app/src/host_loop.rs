//! Plumbing shared by both helpers: the winit user event, the reader's
//! view of the event loop, broker startup and loop scheduling.

use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use muda::MenuEvent;
use tronbun_config::HelperConfig;
use tronbun_ipc::{
    spawn_reader, Broker, DispatchError, DispatchRecord, FrameWriter, Limits, MainLoop, ReaderLoop,
};
use tronbun_platform::event_pump;
use tronbun_webview::manager::Waker;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};

/// Wake-up cadence for the GTK pump when the helper has no configured one.
pub const DEFAULT_PUMP_INTERVAL: Duration = Duration::from_millis(10);

/// User events delivered to the winit loop.
#[derive(Debug)]
pub enum HostEvent {
    /// A request from the reader thread, to run on the main thread.
    Dispatch(DispatchRecord),
    /// The WebView queued page events.
    PageEvents,
    /// A native menu item was activated.
    Menu(MenuEvent),
    /// Stdin closed; exit the loop.
    Shutdown,
}

/// The event loop as seen from the reader thread and toolkit callbacks.
#[derive(Clone)]
pub struct HostProxy(EventLoopProxy<HostEvent>);

impl HostProxy {
    pub fn new(proxy: EventLoopProxy<HostEvent>) -> Self {
        Self(proxy)
    }

    /// A waker for WebView callbacks. Fails silently once the loop is gone.
    pub fn waker(&self) -> Waker {
        let proxy = self.0.clone();
        Arc::new(move || {
            let _ = proxy.send_event(HostEvent::PageEvents);
        })
    }

    /// Route `muda` menu activations (tray and context menus alike) into
    /// the loop.
    pub fn forward_menu_events(&self) {
        let proxy = self.0.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            let _ = proxy.send_event(HostEvent::Menu(event));
        }));
    }
}

impl MainLoop for HostProxy {
    fn enqueue(&self, record: DispatchRecord) -> Result<(), DispatchError> {
        self.0
            .send_event(HostEvent::Dispatch(record))
            .map_err(|_| DispatchError::LoopClosed)
    }

    fn shutdown(&self) {
        let _ = self.0.send_event(HostEvent::Shutdown);
    }
}

/// Load the config, falling back to defaults with a warning on any error.
pub fn load_config(path: Option<&Path>) -> HelperConfig {
    if let Some(p) = path {
        tracing::info!("using config override: {}", p.display());
    }
    tronbun_config::load_config(path).unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        HelperConfig::default()
    })
}

/// Start the stdin reader and build the main-thread broker around stdout.
///
/// Returns the broker and the reader's shutdown flag.
pub fn start_broker(
    config: &HelperConfig,
    proxy: HostProxy,
) -> io::Result<(Broker, Arc<AtomicBool>)> {
    let writer = FrameWriter::stdout();
    let reader = ReaderLoop::new(proxy, writer.clone(), &config.ipc);
    let shutdown = reader.shutdown_flag();
    // Detached: the thread ends on stdin EOF, or with the process.
    spawn_reader(reader)?;
    Ok((Broker::new(writer, Limits::from_config(&config.ipc)), shutdown))
}

/// Pump GTK if needed and pick how long the loop may sleep.
pub fn schedule(event_loop: &ActiveEventLoop, interval: Duration) {
    event_pump::pump();
    if event_pump::NEEDS_POLLING {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + interval));
    } else {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}

/// Run queued records once the native host exists.
pub fn drain_pending(
    pending: &mut Vec<DispatchRecord>,
    broker: &Broker,
    target: &mut dyn tronbun_ipc::CommandTarget,
) {
    for record in pending.drain(..) {
        broker.execute(record, target);
    }
}

// =============================================================================
// TESTS
// =============================================================================
