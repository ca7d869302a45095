use std::process::ExitCode;

use tronbun_app::tray_app::TrayApp;

fn main() -> ExitCode {
    tronbun_app::run("tronbun tray host", |config, broker, _proxy, reader_done| {
        TrayApp::new(config, broker, reader_done)
    })
}
