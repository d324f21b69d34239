//! C-Gate wire protocol: framing, addressing, commands and responses.
//!
//! ## Module Structure
//!
//! - `address`: point addressing and level arithmetic
//! - `line`: newline-delimited framing codec
//! - `request`: outbound command construction
//! - `response`: command-port response classification
//! - `event`: event-port line parsing
//! - `tree`: network tree markup decoding

pub mod address;
pub mod event;
pub mod line;
pub mod request;
pub mod response;
pub mod tree;
