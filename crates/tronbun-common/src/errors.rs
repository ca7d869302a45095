use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("tray error: {0}")]
    TrayError(String),

    #[error("icon error: {0}")]
    IconError(String),

    #[error("menu error: {0}")]
    MenuError(String),

    #[error("notification error: {0}")]
    NotificationError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TronbunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("dispatch_timeout_ms must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: dispatch_timeout_ms must be > 0"
        );
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::TrayError("no status notifier host".into());
        assert_eq!(err.to_string(), "tray error: no status notifier host");

        let err = PlatformError::IconError("not a png".into());
        assert_eq!(err.to_string(), "icon error: not a png");

        let err = PlatformError::NotSupported("wayland context menus".into());
        assert_eq!(err.to_string(), "not supported: wayland context menus");
    }

    #[test]
    fn tronbun_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: TronbunError = config_err.into();
        assert!(matches!(err, TronbunError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn tronbun_error_from_platform() {
        let platform_err = PlatformError::MenuError("duplicate id".into());
        let err: TronbunError = platform_err.into();
        assert!(matches!(err, TronbunError::Platform(_)));
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn tronbun_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: TronbunError = io_err.into();
        assert!(matches!(err, TronbunError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn tronbun_error_other_variants() {
        let err = TronbunError::EventLoop("already running".into());
        assert_eq!(err.to_string(), "event loop error: already running");

        let err = TronbunError::WebView("no display".into());
        assert_eq!(err.to_string(), "webview error: no display");

        let err = TronbunError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
