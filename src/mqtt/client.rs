//! MQTT broker connection and event loop.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::common::{BridgeEvent, BusPublish, Link, ThrottledQueue};
use crate::config::types::MqttConfig;
use crate::mqtt::topics;

const KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Pause between polls after a connection error, while rumqttc retries.
const ERROR_PAUSE: Duration = Duration::from_secs(1);

/// Build the broker client and its polling event loop.
pub fn connect(config: &MqttConfig) -> (AsyncClient, EventLoop) {
    let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
    options.set_keep_alive(KEEP_ALIVE);
    if let (Some(username), Some(password)) = (config.username.as_ref(), config.password.as_ref()) {
        options.set_credentials(username.clone(), password.clone());
    }

    AsyncClient::new(options, 10)
}

/// Spawn the paced publish queue backed by the broker client.
pub fn spawn_publish_queue(client: AsyncClient, interval: Duration) -> ThrottledQueue<BusPublish> {
    ThrottledQueue::spawn(interval, move |message: BusPublish| {
        let client = client.clone();
        async move {
            let result = client
                .publish(message.topic, QoS::AtMostOnce, message.retain, message.payload)
                .await;
            if let Err(e) = result {
                warn!("Bus publish failed: {}", e);
            }
        }
    })
}

/// Poll the broker event loop forever, translating inbound publishes
/// into bridge events.
///
/// rumqttc reconnects on its own after errors; this loop reports the
/// up/down transitions and re-subscribes on every new session.
pub async fn run_bus_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    events_tx: mpsc::UnboundedSender<BridgeEvent>,
    verbose: bool,
) {
    let mut connected = false;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                connected = true;
                info!("Connected to MQTT broker");
                if let Err(e) = client.subscribe(topics::WRITE_FILTER, QoS::AtMostOnce).await {
                    error!("Failed to subscribe to {}: {}", topics::WRITE_FILTER, e);
                }
                let _ = events_tx.send(BridgeEvent::Link {
                    link: Link::Bus,
                    up: true,
                });
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                if verbose {
                    info!(topic = %publish.topic, payload = %payload, "Bus message received");
                } else {
                    debug!(topic = %publish.topic, payload = %payload, "Bus message received");
                }

                match topics::parse_write_topic(&publish.topic) {
                    Some(request) => {
                        let _ = events_tx.send(BridgeEvent::Write { request, payload });
                    }
                    None => debug!(topic = %publish.topic, "Ignoring unroutable topic"),
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                warn!("Broker requested disconnect");
                if connected {
                    connected = false;
                    let _ = events_tx.send(BridgeEvent::Link {
                        link: Link::Bus,
                        up: false,
                    });
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("Broker connection error: {}", e);
                if connected {
                    connected = false;
                    let _ = events_tx.send(BridgeEvent::Link {
                        link: Link::Bus,
                        up: false,
                    });
                }
                tokio::time::sleep(ERROR_PAUSE).await;
            }
        }
    }
}
