//! Config validation. Collects every problem into one `ConfigError`.

use tronbun_common::ConfigError;

use crate::schema::HelperConfig;

/// Smallest frame that can hold a request envelope.
const MIN_COMMAND_LENGTH: usize = 64;

pub fn validate(config: &HelperConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    let ipc = &config.ipc;
    if ipc.max_command_length < MIN_COMMAND_LENGTH {
        errors.push(format!(
            "ipc.max_command_length = {} is below {MIN_COMMAND_LENGTH}",
            ipc.max_command_length
        ));
    }
    if ipc.max_field_length < 2 || ipc.max_field_length > ipc.max_command_length {
        errors.push(format!(
            "ipc.max_field_length = {} is out of range [2, {}]",
            ipc.max_field_length, ipc.max_command_length
        ));
    }
    validate_nonzero(&mut errors, "ipc.dispatch_timeout_ms", ipc.dispatch_timeout_ms);
    validate_nonzero(&mut errors, "tray.poll_interval_ms", config.tray.poll_interval_ms);

    if config.window.width == 0 || config.window.height == 0 {
        errors.push(format!(
            "window size {}x{} must be non-zero",
            config.window.width, config.window.height
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_nonzero(errors: &mut Vec<String>, name: &str, value: u64) {
    if value == 0 {
        errors.push(format!("{name} must be > 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&HelperConfig::default()).is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = HelperConfig::default();
        config.ipc.dispatch_timeout_ms = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("dispatch_timeout_ms"));
    }

    #[test]
    fn field_longer_than_command_is_rejected() {
        let mut config = HelperConfig::default();
        config.ipc.max_field_length = config.ipc.max_command_length + 1;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("max_field_length"));
    }

    #[test]
    fn errors_are_collected() {
        let mut config = HelperConfig::default();
        config.ipc.max_command_length = 8;
        config.tray.poll_interval_ms = 0;
        config.window.width = 0;
        let msg = validate(&config).unwrap_err().to_string();
        assert!(msg.contains("max_command_length"));
        assert!(msg.contains("poll_interval_ms"));
        assert!(msg.contains("window size"));
    }
}
