//! Status publication toward the bus.

use serde_json::Value;

use crate::common::BusPublish;
use crate::mqtt::topics;
use crate::protocol::address::{percent_from_level, Address};

/// Builds the bus messages that mirror C-Bus state.
///
/// Every message this produces carries the configured retain flag, so
/// a broker can serve the last known state to late subscribers.
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    retain: bool,
}

impl StatusPublisher {
    pub fn new(retain: bool) -> Self {
        Self { retain }
    }

    /// The two messages describing one observed point level: ON/OFF
    /// state first, then the percentage level.
    pub fn level_messages(&self, address: Address, level: u8) -> [BusPublish; 2] {
        let state = if level > 0 { "ON" } else { "OFF" };
        [
            self.message(topics::state_topic(&address), state.to_string()),
            self.message(
                topics::level_topic(&address),
                percent_from_level(level).to_string(),
            ),
        ]
    }

    /// The message carrying a decoded network tree.
    pub fn tree_message(&self, network: u8, document: &Value) -> BusPublish {
        self.message(topics::tree_topic(network), document.to_string())
    }

    /// The fixed announcement published when the broker link comes up.
    pub fn announcement(&self) -> BusPublish {
        self.message(
            topics::ANNOUNCE_TOPIC.to_string(),
            topics::ANNOUNCE_PAYLOAD.to_string(),
        )
    }

    fn message(&self, topic: String, payload: String) -> BusPublish {
        BusPublish {
            topic,
            payload,
            retain: self.retain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point() -> Address {
        Address::new(254, 56, 4)
    }

    #[test]
    fn test_level_messages_on() {
        let publisher = StatusPublisher::new(false);
        let [state, level] = publisher.level_messages(point(), 128);

        assert_eq!(state.topic, "cbus/read/254/56/4/state");
        assert_eq!(state.payload, "ON");
        assert_eq!(level.topic, "cbus/read/254/56/4/level");
        assert_eq!(level.payload, "50");
    }

    #[test]
    fn test_level_messages_off() {
        let publisher = StatusPublisher::new(false);
        let [state, level] = publisher.level_messages(point(), 0);

        assert_eq!(state.payload, "OFF");
        assert_eq!(level.payload, "0");
    }

    #[test]
    fn test_level_messages_boundaries() {
        let publisher = StatusPublisher::new(false);

        let [state, level] = publisher.level_messages(point(), 255);
        assert_eq!(state.payload, "ON");
        assert_eq!(level.payload, "100");

        // Level 1 is on, but rounds to zero percent
        let [state, level] = publisher.level_messages(point(), 1);
        assert_eq!(state.payload, "ON");
        assert_eq!(level.payload, "0");
    }

    #[test]
    fn test_same_status_twice_publishes_identical_pairs() {
        let publisher = StatusPublisher::new(false);

        // Repeated observations are republished, never deduplicated
        let first = publisher.level_messages(point(), 128);
        let second = publisher.level_messages(point(), 128);

        assert_eq!(first, second);
        assert_eq!(second[0].payload, "ON");
        assert_eq!(second[1].payload, "50");
    }

    #[test]
    fn test_retain_flag_propagates() {
        let retained = StatusPublisher::new(true);
        for message in retained.level_messages(point(), 128) {
            assert!(message.retain);
        }
        assert!(retained.announcement().retain);

        let plain = StatusPublisher::new(false);
        for message in plain.level_messages(point(), 128) {
            assert!(!message.retain);
        }
    }

    #[test]
    fn test_tree_message() {
        let publisher = StatusPublisher::new(false);
        let document = json!({ "Network": { "Unit": ["1"] } });
        let message = publisher.tree_message(254, &document);

        assert_eq!(message.topic, "cbus/read/254///tree");
        assert_eq!(message.payload, document.to_string());
    }

    #[test]
    fn test_announcement() {
        let publisher = StatusPublisher::new(false);
        let message = publisher.announcement();
        assert_eq!(message.topic, "hello/world");
        assert_eq!(message.payload, "CBUS ON");
    }
}
