//! In-process channel pair backed by tokio queues
//!
//! Replies are queued, not broadcast: a reply posted before the driver
//! starts waiting stays in the queue until the driver takes it, and replies
//! are handed out in the order they were posted.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::{Error, Result};

use super::SignalChannel;

/// Create a connected driver/SUT channel pair
pub fn pair() -> (ChannelPair, SutEndpoint) {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    (
        ChannelPair {
            inbound_tx,
            outbound_rx,
        },
        SutEndpoint {
            inbound_rx,
            outbound_tx,
        },
    )
}

/// Driver end: writes the inbound channel, reads the outbound channel
pub struct ChannelPair {
    inbound_tx: mpsc::UnboundedSender<String>,
    outbound_rx: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl SignalChannel for ChannelPair {
    async fn deliver(&mut self, text: String) -> Result<()> {
        self.inbound_tx
            .send(text)
            .map_err(|_| Error::ChannelClosed("system under test"))
    }

    async fn next_reply(&mut self) -> Result<String> {
        self.outbound_rx
            .recv()
            .await
            .ok_or(Error::ChannelClosed("system under test"))
    }
}

/// System-under-test end: reads the inbound channel, writes the outbound one
pub struct SutEndpoint {
    inbound_rx: mpsc::UnboundedReceiver<String>,
    outbound_tx: mpsc::UnboundedSender<String>,
}

impl SutEndpoint {
    /// Receive the next message the driver delivered.
    /// Returns `None` once the driver end is dropped and the queue is drained.
    pub async fn next_inbound(&mut self) -> Option<String> {
        self.inbound_rx.recv().await
    }

    /// Non-blocking variant of [`next_inbound`](Self::next_inbound)
    pub fn try_next_inbound(&mut self) -> Option<String> {
        self.inbound_rx.try_recv().ok()
    }

    /// Publish a reply on the outbound channel
    pub fn post(&self, text: impl Into<String>) -> Result<()> {
        self.outbound_tx
            .send(text.into())
            .map_err(|_| Error::ChannelClosed("driver"))
    }
}
