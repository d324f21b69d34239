//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate C-Gate config
    if config.cgate.host.is_empty() {
        errors.push("cgate.host is required".to_string());
    }
    if config.cgate.project.is_empty() {
        errors.push("cgate.project is required".to_string());
    }
    if config.cgate.project.contains('/') {
        errors.push(format!(
            "cgate.project '{}' must not contain '/'",
            config.cgate.project
        ));
    }
    if config.cgate.command_port == 0 {
        errors.push("cgate.command_port must be non-zero".to_string());
    }
    if config.cgate.event_port == 0 {
        errors.push("cgate.event_port must be non-zero".to_string());
    }

    // Validate broker config
    if config.mqtt.host.is_empty() {
        errors.push("mqtt.host is required".to_string());
    }
    if config.mqtt.port == 0 {
        errors.push("mqtt.port must be non-zero".to_string());
    }
    if config.mqtt.client_id.is_empty() {
        errors.push("mqtt.client_id is required".to_string());
    }

    // Validate bridge tuning
    if config.bridge.message_interval_ms == 0 {
        errors.push("bridge.message_interval_ms must be non-zero".to_string());
    }
    if config.bridge.reconnect_delay_secs == 0 {
        errors.push("bridge.reconnect_delay_secs must be non-zero".to_string());
    }
    if let Some(ref getall) = config.bridge.getall {
        if getall.period_secs == Some(0) {
            errors.push("bridge.getall.period_secs must be non-zero when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
