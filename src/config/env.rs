//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `CGATE_MQTT_CGATE_HOST` - C-Gate server host
//! - `CGATE_MQTT_MQTT_HOST` - MQTT broker host
//! - `CGATE_MQTT_MQTT_USERNAME` - MQTT username
//! - `CGATE_MQTT_MQTT_PASSWORD` - MQTT password

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "CGATE_MQTT";

/// Apply environment variable overrides to a config.
///
/// This allows host names and broker credentials to be provided via
/// the environment instead of the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    // C-Gate server
    if let Ok(host) = env::var(format!("{}_CGATE_HOST", ENV_PREFIX)) {
        config.cgate.host = host;
    }

    // Broker connection
    if let Ok(host) = env::var(format!("{}_MQTT_HOST", ENV_PREFIX)) {
        config.mqtt.host = host;
    }
    if let Ok(username) = env::var(format!("{}_MQTT_USERNAME", ENV_PREFIX)) {
        config.mqtt.username = Some(username);
    }
    if let Ok(password) = env::var(format!("{}_MQTT_PASSWORD", ENV_PREFIX)) {
        config.mqtt.password = Some(password);
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `CGATE_MQTT_CONFIG`, otherwise returns "cgate-mqtt.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "cgate-mqtt.conf".to_string())
}
