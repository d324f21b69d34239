//! Canonical message types for bridge communication.
//!
//! This module defines the single source of truth for the messages
//! exchanged between the connection tasks and the bridge orchestrator.

use serde_json::Value;

use crate::protocol::address::Address;

/// The three transport links the bridge supervises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// C-Gate command port.
    Command,
    /// C-Gate event port.
    Event,
    /// MQTT broker connection.
    Bus,
}

/// A write command parsed from its bus topic.
///
/// The topic action decides which address segments matter; unneeded
/// segments are dropped at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRequest {
    /// `switch` action; payload carries ON or OFF.
    Switch(Address),
    /// `ramp` action; payload carries a keyword or `percent[,fade]`.
    Ramp(Address),
    /// `getall` action: bulk level query for one application.
    GetAll { network: u8, application: u8 },
    /// `gettree` action: request a network's object tree.
    GetTree { network: u8 },
}

/// Events flowing into the bridge orchestrator.
#[derive(Debug)]
pub enum BridgeEvent {
    /// A transport link changed state.
    Link { link: Link, up: bool },
    /// A write command arrived from the bus.
    Write { request: WriteRequest, payload: String },
    /// A point level was observed on either C-Gate port.
    Level { address: Address, level: u8 },
    /// A complete network tree was decoded.
    Tree { document: Value },
}

/// An outbound bus publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusPublish {
    /// Destination topic.
    pub topic: String,
    /// UTF-8 payload.
    pub payload: String,
    /// Whether the broker should retain the message.
    pub retain: bool,
}
