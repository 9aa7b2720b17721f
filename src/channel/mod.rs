//! Message channels between the driver and the system under test
//!
//! The driver only ever sees two channels: an inbound one it writes
//! messages into, and an outbound one it reads replies from. Anything that
//! can do both implements [`SignalChannel`].

mod local;
mod responder;

use async_trait::async_trait;

use crate::common::Result;

pub use local::{pair, ChannelPair, SutEndpoint};
pub use responder::{EchoResponder, ResponderHandle};

/// Driver-side view of the inbound/outbound channel pair
#[async_trait]
pub trait SignalChannel: Send {
    /// Write a serialized message to the inbound channel.
    /// There is no acknowledgement from the receiving side.
    async fn deliver(&mut self, text: String) -> Result<()>;

    /// Take the next serialized reply from the outbound channel,
    /// suspending until one is available
    async fn next_reply(&mut self) -> Result<String>;
}
