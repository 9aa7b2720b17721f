//! Screen-sharing signaling protocol
//!
//! Message types exchanged between presenter and participant, and the JSON
//! text encoding used on both channels.

pub mod codec;
pub mod types;

pub use types::*;
