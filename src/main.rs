//! cgate-mqtt - MQTT bridge for Clipsal C-Bus automation via C-Gate
//!
//! Relays write commands from bus topics to the C-Gate command port
//! and republishes C-Bus state changes back onto read topics.

mod bridge;
mod cgate;
mod common;
mod config;
mod mqtt;
mod protocol;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info};

use bridge::{BridgeOrchestrator, ChannelBundle};
use config::{env::get_config_path, load_and_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("cgate-mqtt v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  C-Gate server: {}", config.cgate.host);
    info!("  C-Gate project: {}", config.cgate.project);
    info!("  MQTT broker: {}:{}", config.mqtt.host, config.mqtt.port);

    let interval = config.bridge.message_interval();
    let delay = config.bridge.reconnect_delay();

    // ============================================================
    // Channels, broker client and paced queues
    // ============================================================

    let ChannelBundle {
        events_tx,
        events_rx,
        gateway_lines_tx,
        gateway_lines_rx,
    } = ChannelBundle::new();

    let (bus_client, bus_eventloop) = mqtt::client::connect(&config.mqtt);

    let gateway_queue = cgate::spawn_command_queue(gateway_lines_tx, interval);
    let bus_queue = mqtt::client::spawn_publish_queue(bus_client.clone(), interval);

    let orchestrator = BridgeOrchestrator::new(&config, gateway_queue, bus_queue);

    // ============================================================
    // Spawn the bridge loop and the connection tasks
    // ============================================================

    let bridge_task = tokio::spawn(orchestrator.run(events_rx));

    let command_task = tokio::spawn(cgate::run_command_channel(
        config.cgate.host.clone(),
        config.cgate.command_port,
        delay,
        gateway_lines_rx,
        events_tx.clone(),
    ));

    let event_task = tokio::spawn(cgate::run_event_channel(
        config.cgate.host.clone(),
        config.cgate.event_port,
        delay,
        events_tx.clone(),
    ));

    let bus_task = tokio::spawn(mqtt::client::run_bus_loop(
        bus_eventloop,
        bus_client,
        events_tx,
        config.bridge.verbose,
    ));

    tokio::select! {
        biased;
        _ = shutdown_signal() => {}
        _ = bridge_task => error!("Bridge task ended unexpectedly"),
        _ = command_task => error!("Command connection task ended unexpectedly"),
        _ = event_task => error!("Event connection task ended unexpectedly"),
        _ = bus_task => error!("Broker task ended unexpectedly"),
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
