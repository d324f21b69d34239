//! Bridge core: translation, publication and orchestration.
//!
//! ## Module Structure
//!
//! - `channels`: Communication channel structures
//! - `orchestrator`: Main bridge event loop (`BridgeOrchestrator`)
//! - `publisher`: C-Bus state to bus message mapping
//! - `translator`: Bus write to C-Gate command mapping

pub mod channels;
pub mod orchestrator;
pub mod publisher;
pub mod translator;

// Re-export main types for convenience
pub use channels::ChannelBundle;
pub use orchestrator::BridgeOrchestrator;
