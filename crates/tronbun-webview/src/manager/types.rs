use tronbun_config::HelperConfig;
use tronbun_ipc::Limits;

/// Configuration for creating the helper's WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// HTML rendered until the peer navigates somewhere.
    pub html: String,
    /// Whether to enable dev tools.
    pub devtools: bool,
    /// Whether the WebView background starts transparent.
    pub transparent: bool,
    /// Ceilings reported by `get_version`.
    pub limits: Limits,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            html: "<html><body></body></html>".to_string(),
            devtools: cfg!(debug_assertions),
            transparent: false,
            limits: Limits::default(),
        }
    }
}

impl WebViewConfig {
    pub fn from_helper(config: &HelperConfig) -> Self {
        Self {
            devtools: config.window.devtools,
            limits: Limits::from_config(&config.ipc),
            ..Default::default()
        }
    }
}
