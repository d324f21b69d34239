//! Event-port line parsing.
//!
//! The event port reports state changes as they happen, one line per
//! change: `lighting <action> <path> [<level>]`. Only lighting events
//! carry levels the bridge republishes; every other event kind passes
//! through unremarked.

use crate::common::error::ProtocolError;
use crate::protocol::address::Address;

const LIGHTING: &str = "lighting";

/// Parse one event-port line into an observed point level.
///
/// Returns `Ok(None)` for event kinds and lighting actions the bridge
/// does not track, `Err` for lighting lines that break the grammar.
pub fn parse_event_line(line: &str) -> Result<Option<(Address, u8)>, ProtocolError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some(LIGHTING) {
        return Ok(None);
    }

    let bad = || ProtocolError::BadEvent {
        line: line.to_string(),
    };

    let action = tokens.next().ok_or_else(bad)?;
    let path = tokens.next().ok_or_else(bad)?;

    let level = match action {
        "on" => 255,
        "off" => 0,
        "ramp" => tokens
            .next()
            .and_then(|token| token.parse::<u8>().ok())
            .ok_or_else(bad)?,
        _ => return Ok(None),
    };

    Ok(Some((Address::from_path(path)?, level)))
}
