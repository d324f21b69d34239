//! Configuration type definitions.

use std::time::Duration;

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub cgate: CgateConfig,
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// C-Gate server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CgateConfig {
    pub host: String,
    /// C-Gate project name, interpolated into every object path.
    pub project: String,
    #[serde(default = "default_command_port")]
    pub command_port: u16,
    #[serde(default = "default_event_port")]
    pub event_port: u16,
}

/// MQTT broker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

/// Bridge behavior tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Publish state topics with the broker retain flag set.
    #[serde(default)]
    pub retain_reads: bool,
    /// Minimum spacing between outbound messages, per direction.
    #[serde(default = "default_message_interval_ms")]
    pub message_interval_ms: u64,
    /// Delay between C-Gate reconnection attempts.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Log every relayed message at info level.
    #[serde(default)]
    pub verbose: bool,
    pub getall: Option<GetAllConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            retain_reads: false,
            message_interval_ms: default_message_interval_ms(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            verbose: false,
            getall: None,
        }
    }
}

impl BridgeConfig {
    /// Pacing interval between queue deliveries.
    pub fn message_interval(&self) -> Duration {
        Duration::from_millis(self.message_interval_ms)
    }

    /// Delay between C-Gate reconnection attempts.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Bulk level query settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GetAllConfig {
    pub network: u8,
    pub application: u8,
    /// Issue one bulk query when all three links come up.
    #[serde(default)]
    pub on_start: bool,
    /// Repeat the bulk query on this period while the links stay up.
    pub period_secs: Option<u64>,
}

fn default_command_port() -> u16 {
    20023
}

fn default_event_port() -> u16 {
    20025
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "cgate-mqtt".to_string()
}

fn default_message_interval_ms() -> u64 {
    200
}

fn default_reconnect_delay_secs() -> u64 {
    10
}
