//! The two helper processes, `tronbun-webview-host` and `tronbun-tray-host`.
//!
//! Each binary parses its CLI, sets up logging to stderr, loads the
//! helper config, starts the stdin reader and runs a winit event loop
//! whose user events carry dispatched requests to the main thread.

pub mod cli;
pub mod host_loop;
pub mod logging;
pub mod tray_app;
pub mod webview_app;

use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tronbun_config::HelperConfig;
use tronbun_ipc::Broker;
use tronbun_platform::event_pump;
use winit::application::ApplicationHandler;
use winit::event_loop::EventLoop;

use host_loop::{HostEvent, HostProxy};

/// A helper's top-level handler.
pub trait HelperApp: ApplicationHandler<HostEvent> {
    /// The native surface could not be created.
    fn failed(&self) -> bool;
}

/// Run one helper to completion. `make_app` builds its handler once the
/// broker is up.
pub fn run<A, F>(name: &str, make_app: F) -> ExitCode
where
    A: HelperApp,
    F: FnOnce(HelperConfig, Broker, HostProxy, Arc<AtomicBool>) -> A,
{
    let args = cli::parse();
    logging::init(args.log_level.as_deref());
    logging::install_panic_hook();

    tracing::info!("{name} v{} starting", env!("CARGO_PKG_VERSION"));
    let config = host_loop::load_config(args.config.as_deref());

    if let Err(e) = event_pump::init() {
        tracing::error!("toolkit init failed: {e}");
        return ExitCode::FAILURE;
    }

    let event_loop = match EventLoop::<HostEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };

    let proxy = HostProxy::new(event_loop.create_proxy());
    proxy.forward_menu_events();

    let (broker, reader_done) = match host_loop::start_broker(&config, proxy.clone()) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("failed to start stdin reader: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = make_app(config, broker, proxy, reader_done);

    tracing::info!("entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("event loop error: {e}");
        return ExitCode::FAILURE;
    }
    if app.failed() {
        return ExitCode::FAILURE;
    }
    tracing::info!("shutdown complete");
    ExitCode::SUCCESS
}
