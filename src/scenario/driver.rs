//! Scenario driver
//!
//! Runs one scenario as a single sequential task. The only suspension
//! points are the delay before each send and each reply wait; steps never
//! overlap.

use std::time::Duration;

use serde_json::Value;

use crate::channel::SignalChannel;
use crate::common::{Error, Result};
use crate::protocol::codec;

use super::step::{Scenario, Step};

/// Everything a scenario run put on the wire and got back
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Transcript {
    /// Serialized messages delivered to the inbound channel, in order
    pub sent: Vec<String>,
    /// Decoded replies taken from the outbound channel, in order
    pub replies: Vec<Value>,
}

/// Executes scenarios against a channel pair
pub struct Driver<'a> {
    channel: &'a mut dyn SignalChannel,
    reply_timeout: Option<Duration>,
}

impl<'a> Driver<'a> {
    pub fn new(channel: &'a mut dyn SignalChannel) -> Self {
        Self {
            channel,
            reply_timeout: None,
        }
    }

    /// Bound every reply wait. Without a timeout a wait lasts until a reply
    /// arrives or the channel closes.
    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Run `scenario` to completion
    ///
    /// Stops at the first failing step: a closed channel, a timed-out wait,
    /// or a reply that is not valid JSON.
    pub async fn run(&mut self, scenario: Scenario) -> Result<Transcript> {
        let (name, steps) = scenario.into_steps();
        let mut transcript = Transcript::default();

        tracing::info!(scenario = %name, steps = steps.len(), "Scenario started");

        for (i, step) in steps.iter().enumerate() {
            self.execute(step, i + 1, &mut transcript).await?;
        }

        tracing::info!(
            scenario = %name,
            sent = transcript.sent.len(),
            replies = transcript.replies.len(),
            "Scenario finished"
        );
        Ok(transcript)
    }

    /// Execute a single step, recording what it sent or received
    pub async fn execute(
        &mut self,
        step: &Step,
        step_num: usize,
        transcript: &mut Transcript,
    ) -> Result<()> {
        match step {
            Step::Send { delay, message } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                let text = codec::encode(message)?;
                tracing::debug!(step = step_num, "signal >>> {}", text);
                self.channel.deliver(text.clone()).await?;
                transcript.sent.push(text);
            }
            Step::AwaitReply => {
                tracing::debug!(step = step_num, "awaiting reply");
                let text = self.next_reply().await?;
                tracing::debug!(step = step_num, "signal <<< {}", text);
                transcript.replies.push(codec::decode_reply(&text)?);
            }
        }
        Ok(())
    }

    async fn next_reply(&mut self) -> Result<String> {
        match self.reply_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.channel.next_reply())
                .await
                .map_err(|_| Error::ReplyTimeout(timeout.as_millis() as u64))?,
            None => self.channel.next_reply().await,
        }
    }
}
