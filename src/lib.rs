//! Screen-sharing signaling simulator
//!
//! Drives scripted presenter/participant negotiations over a pair of
//! message channels: messages go in on the inbound channel, replies come
//! back on the outbound channel. Four named scenarios cover the VNC retry,
//! direct WebRTC, VNC mobile fallback and bare participant cases.

pub mod channel;
pub mod cli;
pub mod commands;
pub mod common;
pub mod protocol;
pub mod scenario;
pub mod testing;

// Re-export commonly used types for tests
pub use channel::{pair, ChannelPair, SignalChannel, SutEndpoint};
pub use common::{Error, Result};
pub use protocol::Message;
pub use scenario::{Driver, Scenario, ScenarioKind, Transcript};
