//! Bus topic grammar.
//!
//! Write topics carry commands toward the bus:
//! `cbus/write/<net>/<app>/<group>/<action>`. Read topics carry state
//! back out: `cbus/read/<net>/<app>/<group>/state`, `.../level`, and
//! `cbus/read/<net>///tree` for tree dumps.

use crate::common::WriteRequest;
use crate::protocol::address::Address;

/// Wildcard filter covering every write topic.
pub const WRITE_FILTER: &str = "cbus/write/#";

/// Announcement published whenever the broker connection comes up.
pub const ANNOUNCE_TOPIC: &str = "hello/world";
pub const ANNOUNCE_PAYLOAD: &str = "CBUS ON";

/// Parse a write topic into a typed request.
///
/// Action matching is case-insensitive. Address segments an action
/// does not need may be empty; a needed segment that does not parse
/// makes the whole topic unroutable.
pub fn parse_write_topic(topic: &str) -> Option<WriteRequest> {
    let segments: Vec<&str> = topic.split('/').collect();
    if segments.len() < 6 || segments[0] != "cbus" || segments[1] != "write" {
        return None;
    }

    let network = segments[2];
    let application = segments[3];
    let group = segments[4];

    match segments[5].to_lowercase().as_str() {
        "gettree" => Some(WriteRequest::GetTree {
            network: network.parse().ok()?,
        }),
        "getall" => Some(WriteRequest::GetAll {
            network: network.parse().ok()?,
            application: application.parse().ok()?,
        }),
        "switch" => Some(WriteRequest::Switch(parse_point(network, application, group)?)),
        "ramp" => Some(WriteRequest::Ramp(parse_point(network, application, group)?)),
        _ => None,
    }
}

fn parse_point(network: &str, application: &str, group: &str) -> Option<Address> {
    Some(Address::new(
        network.parse().ok()?,
        application.parse().ok()?,
        group.parse().ok()?,
    ))
}

/// Topic carrying a point's ON/OFF state.
pub fn state_topic(address: &Address) -> String {
    format!("cbus/read/{}/state", address)
}

/// Topic carrying a point's percentage level.
pub fn level_topic(address: &Address) -> String {
    format!("cbus/read/{}/level", address)
}

/// Topic carrying a network's object tree.
pub fn tree_topic(network: u8) -> String {
    format!("cbus/read/{}///tree", network)
}
