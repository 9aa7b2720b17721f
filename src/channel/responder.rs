//! Echo responder: a stand-in for the system under test
//!
//! Reads every message the driver delivers, keeps a transcript of them, and
//! echoes selected message kinds back on the outbound channel so that the
//! driver's reply waits complete.

use tokio::task::JoinHandle;

use crate::common::{Error, Result};
use crate::protocol::{codec, Message, MessageKind};

use super::SutEndpoint;

/// Background task playing the system under test
pub struct EchoResponder {
    sut: SutEndpoint,
    reply_on: Vec<MessageKind>,
    received: Vec<Message>,
}

/// Handle to a running [`EchoResponder`]
pub struct ResponderHandle {
    task: JoinHandle<Result<Vec<Message>>>,
}

impl EchoResponder {
    pub fn new(sut: SutEndpoint, reply_on: Vec<MessageKind>) -> Self {
        Self {
            sut,
            reply_on,
            received: Vec::new(),
        }
    }

    /// Start the responder on the current runtime.
    /// It stops once the driver end of the channel pair is dropped.
    pub fn spawn(self) -> ResponderHandle {
        ResponderHandle {
            task: tokio::spawn(self.run()),
        }
    }

    async fn run(mut self) -> Result<Vec<Message>> {
        while let Some(text) = self.sut.next_inbound().await {
            let message = match codec::decode(&text) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Responder ignoring undecodable message: {}", e);
                    continue;
                }
            };

            let kind = message.kind();
            tracing::info!(%kind, "SUT received {}", text);

            if self.reply_on.contains(&kind) {
                tracing::debug!(%kind, "SUT echoing reply");
                // The driver may already be gone after its final step
                if let Err(e) = self.sut.post(text) {
                    tracing::debug!("Reply dropped: {}", e);
                }
            }

            self.received.push(message);
        }

        Ok(self.received)
    }
}

impl ResponderHandle {
    /// Wait for the responder to stop and return every message it received.
    /// Drop the driver end first, or this waits forever.
    pub async fn finish(self) -> Result<Vec<Message>> {
        self.task
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}
