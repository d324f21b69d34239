//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;
pub mod reconnect;
pub mod throttle;

// Re-export message types from messages module
pub use messages::{BridgeEvent, BusPublish, Link, WriteRequest};
pub use throttle::ThrottledQueue;
