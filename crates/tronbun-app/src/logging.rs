//! Diagnostics go to stderr. Stdout carries protocol frames only.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "tronbun=info";

/// Turn a `--log-level` value into a filter directive. A bare level
/// applies to the helper's own crates only.
pub fn directive_text(log_level: Option<&str>) -> String {
    match log_level {
        Some(level) if is_bare_level(level) => format!("tronbun={}", level.to_ascii_lowercase()),
        Some(other) => other.to_string(),
        None => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn is_bare_level(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}

fn directive(log_level: Option<&str>) -> Directive {
    let text = directive_text(log_level);
    text.parse().unwrap_or_else(|e| {
        eprintln!("invalid log level {text:?} ({e}), using {DEFAULT_DIRECTIVE}");
        LevelFilter::INFO.into()
    })
}

pub fn init(log_level: Option<&str>) {
    let filter = EnvFilter::from_default_env().add_directive(directive(log_level));
    let result = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}

/// Log panics through `tracing` before the default hook prints them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(%location, "helper panicked: {info}");
        default_hook(info);
    }));
}

// =============================================================================
// TESTS
// =============================================================================
