use std::process::ExitCode;

use tronbun_app::webview_app::WebviewApp;

fn main() -> ExitCode {
    tronbun_app::run("tronbun webview host", WebviewApp::new)
}
