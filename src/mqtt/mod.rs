//! MQTT broker integration.
//!
//! ## Module Structure
//!
//! - `client`: broker connection, event loop, publish queue
//! - `topics`: bus topic grammar (write parsing, read building)

pub mod client;
pub mod topics;
