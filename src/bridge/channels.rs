//! Bridge channel management.
//!
//! Provides the communication channels wiring the connection tasks to
//! the orchestrator and the command queue to its supervisor.

use tokio::sync::mpsc;

use crate::common::BridgeEvent;

/// Bundle of all channels created by the bridge.
pub struct ChannelBundle {
    /// Event fan-in: every connection task clones this sender.
    pub events_tx: mpsc::UnboundedSender<BridgeEvent>,
    /// Receiver side of the event fan-in (the orchestrator listens).
    pub events_rx: mpsc::UnboundedReceiver<BridgeEvent>,
    /// Paced command lines heading for the C-Gate command port.
    pub gateway_lines_tx: mpsc::UnboundedSender<String>,
    /// Receiver side for the command channel supervisor.
    pub gateway_lines_rx: mpsc::UnboundedReceiver<String>,
}

impl ChannelBundle {
    /// Create a new set of bridge channels.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (gateway_lines_tx, gateway_lines_rx) = mpsc::unbounded_channel();

        Self {
            events_tx,
            events_rx,
            gateway_lines_tx,
            gateway_lines_rx,
        }
    }
}

impl Default for ChannelBundle {
    fn default() -> Self {
        Self::new()
    }
}
