//! C-Gate server integration.
//!
//! This module contains:
//! - Command-port supervision: writes paced commands, reads responses
//! - Event-port supervision: reads unsolicited state change reports

pub mod client;

// Re-export commonly used entry points
pub use client::{run_command_channel, run_event_channel, spawn_command_queue};
