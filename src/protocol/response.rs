//! Command-port response classification.
//!
//! The command port answers with numeric response codes. The bridge
//! cares about two families: `300` level reports (solicited by `GET`
//! or produced by event reporting) and the `343`/`347`/`344` sequence
//! bracketing a `TREEXML` dump. Everything else is ignored.

use serde_json::Value;
use tracing::warn;

use crate::common::error::ProtocolError;
use crate::protocol::address::Address;
use crate::protocol::tree::parse_markup;

/// Response code carrying a point level report.
const STATUS: &str = "300";
/// Response code opening a tree dump.
const TREE_START: &str = "343";
/// Response code carrying one line of tree XML.
const TREE_FRAGMENT: &str = "347";
/// Response code closing a tree dump.
const TREE_END: &str = "344";

/// A response line the bridge reacts to.
#[derive(Debug, PartialEq)]
pub enum ResponseEvent {
    /// A point reported its level.
    Level { address: Address, level: u8 },
    /// A complete tree dump was decoded.
    Tree { document: Value },
}

/// Classifies command-port lines, accumulating tree fragments between
/// the start and end codes.
#[derive(Debug, Default)]
pub struct ResponseHandler {
    tree: String,
}

impl ResponseHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one complete response line.
    ///
    /// The code is the token before the first `-`, or the first
    /// space-separated token when no `-` is present. Malformed status
    /// records and undecodable trees are logged and dropped; they
    /// never fail the session.
    pub fn handle_line(&mut self, line: &str) -> Option<ResponseEvent> {
        let (head, rest) = match line.split_once('-') {
            Some((head, rest)) => (head, Some(rest)),
            None => (line, None),
        };

        match (head, rest) {
            (STATUS, Some(record)) => status_event(record),
            (TREE_FRAGMENT, _) => {
                self.tree.push_str(rest.unwrap_or_default());
                self.tree.push('\n');
                None
            }
            (TREE_START, _) => {
                self.tree.clear();
                None
            }
            _ => {
                let (code, record) = match head.split_once(' ') {
                    Some((code, record)) => (code, record),
                    None => (head, ""),
                };
                match code {
                    TREE_END => self.flush_tree(),
                    STATUS => status_event(record),
                    _ => None,
                }
            }
        }
    }

    /// Decode the accumulated tree dump, resetting the buffer whether
    /// or not it parses.
    fn flush_tree(&mut self) -> Option<ResponseEvent> {
        let markup = std::mem::take(&mut self.tree);
        match parse_markup(&markup) {
            Ok(document) => Some(ResponseEvent::Tree { document }),
            Err(e) => {
                warn!("Discarding undecodable tree: {}", e);
                None
            }
        }
    }
}

fn status_event(record: &str) -> Option<ResponseEvent> {
    match parse_status(record) {
        Ok((address, level)) => Some(ResponseEvent::Level { address, level }),
        Err(e) => {
            warn!("Ignoring malformed status record: {}", e);
            None
        }
    }
}

/// Parse one status record: `//PROJECT/net/app/group: level=<n>`,
/// tolerating trailing annotation tokens.
fn parse_status(record: &str) -> Result<(Address, u8), ProtocolError> {
    let bad = || ProtocolError::BadStatus {
        record: record.to_string(),
    };

    let mut tokens = record.split_whitespace();
    let path = tokens.next().ok_or_else(bad)?;
    let level = tokens.next().ok_or_else(bad)?;

    let path = path.strip_suffix(':').unwrap_or(path);
    let address = Address::from_path(path)?;

    let level = level
        .split_once('=')
        .and_then(|(_, value)| value.parse::<u8>().ok())
        .ok_or_else(bad)?;

    Ok((address, level))
}
