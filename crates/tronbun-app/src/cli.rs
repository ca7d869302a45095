use std::path::PathBuf;

use clap::Parser;

/// Tronbun native helper. Speaks newline-delimited JSON on stdin/stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error), or a full filter
    /// directive such as `tronbun_ipc=debug`.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_the_normal_mode() {
        let args = Args::try_parse_from(["tronbun-tray-host"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "tronbun-webview-host",
            "--config",
            "/tmp/helper.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/helper.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["tronbun-tray-host", "--bogus"]).is_err());
    }
}
