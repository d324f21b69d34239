//! C-Gate command and event port connections.
//!
//! Both ports get the same supervision: connect, report the link up,
//! run one session until the stream ends, report the link down, wait
//! out the reconnection delay and try again. Sessions are generic over
//! the stream so tests drive them with in-memory pipes.

use anyhow::Result;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::common::reconnect::reconnect_delays;
use crate::common::{BridgeEvent, Link, ThrottledQueue};
use crate::protocol::event::parse_event_line;
use crate::protocol::line::new_line_connection;
use crate::protocol::response::{ResponseEvent, ResponseHandler};

/// Spawn the paced writer feeding lines into the command session.
pub fn spawn_command_queue(
    lines_tx: mpsc::UnboundedSender<String>,
    interval: Duration,
) -> ThrottledQueue<String> {
    ThrottledQueue::spawn(interval, move |line: String| {
        let lines_tx = lines_tx.clone();
        async move {
            if lines_tx.send(line).is_err() {
                debug!("Dropping command line, session writer is gone");
            }
        }
    })
}

/// Supervise the command-port connection, reconnecting forever.
pub async fn run_command_channel(
    host: String,
    port: u16,
    delay: Duration,
    mut lines_rx: mpsc::UnboundedReceiver<String>,
    events_tx: mpsc::UnboundedSender<BridgeEvent>,
) {
    let mut delays = reconnect_delays(delay);

    loop {
        info!("Connecting to C-Gate command port at {}:{}", host, port);
        match TcpStream::connect((host.as_str(), port)).await {
            Ok(stream) => {
                info!("Command connection established");
                let _ = events_tx.send(BridgeEvent::Link {
                    link: Link::Command,
                    up: true,
                });

                match run_command_session(stream, &mut lines_rx, &events_tx).await {
                    Ok(()) => warn!("Command connection closed by C-Gate"),
                    Err(e) => warn!("Command session failed: {}", e),
                }

                let _ = events_tx.send(BridgeEvent::Link {
                    link: Link::Command,
                    up: false,
                });
            }
            Err(e) => warn!("Failed to connect to C-Gate command port: {}", e),
        }

        let pause = delays.next().unwrap_or(delay);
        info!("Retrying command connection in {:?}", pause);
        discard_while_down(pause, &mut lines_rx).await;
    }
}

/// Run one command-port session until the stream ends or errors.
///
/// Queued lines go out to the gateway; classified responses come back
/// as bridge events. Response state lives here so every session starts
/// with an empty tree buffer.
async fn run_command_session<S>(
    stream: S,
    lines_rx: &mut mpsc::UnboundedReceiver<String>,
    events_tx: &mpsc::UnboundedSender<BridgeEvent>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut connection = new_line_connection(stream);
    let mut handler = ResponseHandler::new();

    loop {
        tokio::select! {
            line = connection.next() => {
                match line {
                    Some(Ok(line)) => {
                        debug!("Command port: {}", line);
                        if let Some(event) = handler.handle_line(&line) {
                            let event = match event {
                                ResponseEvent::Level { address, level } => {
                                    BridgeEvent::Level { address, level }
                                }
                                ResponseEvent::Tree { document } => BridgeEvent::Tree { document },
                            };
                            let _ = events_tx.send(event);
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()), // Connection closed
                }
            }

            Some(line) = lines_rx.recv() => {
                debug!("Sending command: {}", line);
                connection.send(line).await?;
            }
        }
    }
}

/// Wait out the reconnection delay, dropping queued lines so stale
/// writes never burst into the next session.
async fn discard_while_down(pause: Duration, lines_rx: &mut mpsc::UnboundedReceiver<String>) {
    let deadline = tokio::time::sleep(pause);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return,
            line = lines_rx.recv() => match line {
                Some(line) => warn!("Dropping command while disconnected: {}", line),
                None => {
                    deadline.await;
                    return;
                }
            },
        }
    }
}

/// Supervise the event-port connection, reconnecting forever.
pub async fn run_event_channel(
    host: String,
    port: u16,
    delay: Duration,
    events_tx: mpsc::UnboundedSender<BridgeEvent>,
) {
    let mut delays = reconnect_delays(delay);

    loop {
        info!("Connecting to C-Gate event port at {}:{}", host, port);
        match TcpStream::connect((host.as_str(), port)).await {
            Ok(stream) => {
                info!("Event connection established");
                let _ = events_tx.send(BridgeEvent::Link {
                    link: Link::Event,
                    up: true,
                });

                match run_event_session(stream, &events_tx).await {
                    Ok(()) => warn!("Event connection closed by C-Gate"),
                    Err(e) => warn!("Event session failed: {}", e),
                }

                let _ = events_tx.send(BridgeEvent::Link {
                    link: Link::Event,
                    up: false,
                });
            }
            Err(e) => warn!("Failed to connect to C-Gate event port: {}", e),
        }

        let pause = delays.next().unwrap_or(delay);
        info!("Retrying event connection in {:?}", pause);
        tokio::time::sleep(pause).await;
    }
}

/// Run one event-port session, relaying observed levels to the bridge.
async fn run_event_session<S>(
    stream: S,
    events_tx: &mpsc::UnboundedSender<BridgeEvent>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut connection = new_line_connection(stream);

    while let Some(line) = connection.next().await {
        let line = line?;
        debug!("Event port: {}", line);
        match parse_event_line(&line) {
            Ok(Some((address, level))) => {
                let _ = events_tx.send(BridgeEvent::Level { address, level });
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring malformed event: {}", e),
        }
    }

    Ok(())
}
