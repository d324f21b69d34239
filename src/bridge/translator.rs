//! Write command translation.
//!
//! Turns parsed bus write requests into C-Gate commands. Relative
//! dimming (INCREASE/DECREASE) takes two steps: the request registers
//! a pending direction and issues a level query; when the queried
//! level comes back, the pending entry resolves into an absolute ramp.

use std::collections::HashMap;

use tracing::debug;

use crate::common::WriteRequest;
use crate::protocol::address::{level_from_percent, Address, RAMP_STEP};
use crate::protocol::request::Request;

/// Direction of a registered relative ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RampDirection {
    Increase,
    Decrease,
}

/// Translates bus write requests into C-Gate commands.
///
/// Owns the pending relative-ramp registry (keyed by address, last
/// registration wins) and remembers which network the most recent
/// tree request named.
#[derive(Debug, Default)]
pub struct CommandTranslator {
    pending_ramps: HashMap<Address, RampDirection>,
    tree_network: Option<u8>,
}

impl CommandTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one write request and its payload to C-Gate commands.
    ///
    /// Unrecognized payloads translate to nothing.
    pub fn translate(&mut self, request: WriteRequest, payload: &str) -> Vec<Request> {
        match request {
            WriteRequest::Switch(address) => match payload {
                "ON" => vec![Request::TurnOn(address)],
                "OFF" => vec![Request::TurnOff(address)],
                _ => {
                    debug!(payload, "Ignoring unrecognized switch payload");
                    Vec::new()
                }
            },
            WriteRequest::Ramp(address) => self.translate_ramp(address, payload),
            WriteRequest::GetAll { network, application } => {
                vec![Request::GetAllLevels { network, application }]
            }
            WriteRequest::GetTree { network } => {
                self.tree_network = Some(network);
                vec![Request::GetTree { network }]
            }
        }
    }

    fn translate_ramp(&mut self, address: Address, payload: &str) -> Vec<Request> {
        match payload.to_uppercase().as_str() {
            "INCREASE" => {
                self.pending_ramps.insert(address, RampDirection::Increase);
                vec![Request::GetLevel(address)]
            }
            "DECREASE" => {
                self.pending_ramps.insert(address, RampDirection::Decrease);
                vec![Request::GetLevel(address)]
            }
            "ON" => vec![Request::TurnOn(address)],
            "OFF" => vec![Request::TurnOff(address)],
            _ => {
                let mut parts = payload.split(',');
                let percent = parts.next().unwrap_or_default();
                let fade = parts
                    .next()
                    .map(str::trim)
                    .filter(|fade| !fade.is_empty())
                    .map(str::to_string);

                match level_from_percent(percent) {
                    Some(level) => vec![Request::Ramp { address, level, fade }],
                    None => {
                        debug!(payload, "Ignoring unrecognized ramp payload");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Resolve the pending relative ramp for an address against its
    /// observed level. Consumes the registration.
    pub fn fulfill_ramp(&mut self, address: Address, level: u8) -> Option<Request> {
        let direction = self.pending_ramps.remove(&address)?;
        let target = match direction {
            RampDirection::Increase => level.saturating_add(RAMP_STEP),
            RampDirection::Decrease => level.saturating_sub(RAMP_STEP),
        };
        Some(Request::Ramp {
            address,
            level: target,
            fade: None,
        })
    }

    /// The network named by the most recent tree request, if any.
    /// Consumes the registration so one request claims one dump.
    pub fn take_tree_network(&mut self) -> Option<u8> {
        self.tree_network.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Address {
        Address::new(254, 56, 4)
    }

    #[test]
    fn test_switch_on_off() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Switch(point()), "ON"),
            vec![Request::TurnOn(point())]
        );
        assert_eq!(
            translator.translate(WriteRequest::Switch(point()), "OFF"),
            vec![Request::TurnOff(point())]
        );
    }

    #[test]
    fn test_switch_payload_is_case_sensitive() {
        let mut translator = CommandTranslator::new();
        assert!(translator.translate(WriteRequest::Switch(point()), "on").is_empty());
        assert!(translator.translate(WriteRequest::Switch(point()), "toggle").is_empty());
    }

    #[test]
    fn test_ramp_keywords() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "ON"),
            vec![Request::TurnOn(point())]
        );
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "off"),
            vec![Request::TurnOff(point())]
        );
    }

    #[test]
    fn test_ramp_percent() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "50"),
            vec![Request::Ramp {
                address: point(),
                level: 128,
                fade: None
            }]
        );
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "100"),
            vec![Request::Ramp {
                address: point(),
                level: 255,
                fade: None
            }]
        );
    }

    #[test]
    fn test_ramp_percent_with_fade() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "50,4s"),
            vec![Request::Ramp {
                address: point(),
                level: 128,
                fade: Some("4s".to_string())
            }]
        );
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "50, 2m"),
            vec![Request::Ramp {
                address: point(),
                level: 128,
                fade: Some("2m".to_string())
            }]
        );
        // Empty fade tail is dropped, not rendered
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "50,"),
            vec![Request::Ramp {
                address: point(),
                level: 128,
                fade: None
            }]
        );
    }

    #[test]
    fn test_ramp_rejects_bad_percent() {
        let mut translator = CommandTranslator::new();
        assert!(translator.translate(WriteRequest::Ramp(point()), "101").is_empty());
        assert!(translator.translate(WriteRequest::Ramp(point()), "-10").is_empty());
        assert!(translator.translate(WriteRequest::Ramp(point()), "bright").is_empty());
        assert!(translator.translate(WriteRequest::Ramp(point()), "").is_empty());
    }

    #[test]
    fn test_increase_registers_and_queries() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "INCREASE"),
            vec![Request::GetLevel(point())]
        );

        assert_eq!(
            translator.fulfill_ramp(point(), 100),
            Some(Request::Ramp {
                address: point(),
                level: 126,
                fade: None
            })
        );
        // Registration is consumed
        assert_eq!(translator.fulfill_ramp(point(), 100), None);
    }

    #[test]
    fn test_decrease_is_case_insensitive() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(WriteRequest::Ramp(point()), "decrease"),
            vec![Request::GetLevel(point())]
        );
        assert_eq!(
            translator.fulfill_ramp(point(), 100),
            Some(Request::Ramp {
                address: point(),
                level: 74,
                fade: None
            })
        );
    }

    #[test]
    fn test_relative_ramp_saturates() {
        let mut translator = CommandTranslator::new();

        translator.translate(WriteRequest::Ramp(point()), "INCREASE");
        assert_eq!(
            translator.fulfill_ramp(point(), 240),
            Some(Request::Ramp {
                address: point(),
                level: 255,
                fade: None
            })
        );

        translator.translate(WriteRequest::Ramp(point()), "DECREASE");
        assert_eq!(
            translator.fulfill_ramp(point(), 20),
            Some(Request::Ramp {
                address: point(),
                level: 0,
                fade: None
            })
        );
    }

    #[test]
    fn test_pending_ramps_are_per_address() {
        let mut translator = CommandTranslator::new();
        translator.translate(WriteRequest::Ramp(point()), "INCREASE");

        let other = Address::new(254, 56, 9);
        assert_eq!(translator.fulfill_ramp(other, 100), None);
        assert!(translator.fulfill_ramp(point(), 100).is_some());
    }

    #[test]
    fn test_last_registered_direction_wins() {
        let mut translator = CommandTranslator::new();
        translator.translate(WriteRequest::Ramp(point()), "INCREASE");
        translator.translate(WriteRequest::Ramp(point()), "DECREASE");

        assert_eq!(
            translator.fulfill_ramp(point(), 100),
            Some(Request::Ramp {
                address: point(),
                level: 74,
                fade: None
            })
        );
        assert_eq!(translator.fulfill_ramp(point(), 100), None);
    }

    #[test]
    fn test_getall_translates() {
        let mut translator = CommandTranslator::new();
        assert_eq!(
            translator.translate(
                WriteRequest::GetAll {
                    network: 254,
                    application: 56
                },
                ""
            ),
            vec![Request::GetAllLevels {
                network: 254,
                application: 56
            }]
        );
    }

    #[test]
    fn test_gettree_remembers_network_until_taken() {
        let mut translator = CommandTranslator::new();
        assert_eq!(translator.take_tree_network(), None);

        assert_eq!(
            translator.translate(WriteRequest::GetTree { network: 254 }, ""),
            vec![Request::GetTree { network: 254 }]
        );
        assert_eq!(translator.take_tree_network(), Some(254));
        assert_eq!(translator.take_tree_network(), None);

        // The latest request wins when two arrive before a dump
        translator.translate(WriteRequest::GetTree { network: 254 }, "");
        translator.translate(WriteRequest::GetTree { network: 200 }, "");
        assert_eq!(translator.take_tree_network(), Some(200));
    }
}
