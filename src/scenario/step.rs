//! Scenario steps

use std::time::Duration;

use crate::protocol::Message;

/// A single scripted step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Wait `delay` after the previous step completes, then deliver `message`
    Send { delay: Duration, message: Message },
    /// Suspend until the system under test posts one reply
    AwaitReply,
}

/// An ordered list of steps, executed once from first to last
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a send step
    pub fn send(mut self, delay: Duration, message: Message) -> Self {
        self.steps.push(Step::Send { delay, message });
        self
    }

    /// Append a reply wait
    pub fn await_reply(mut self) -> Self {
        self.steps.push(Step::AwaitReply);
        self
    }

    /// Append an already-built step
    pub fn step(mut self, step: Step) -> Self {
        self.push(step);
        self
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Messages this scenario sends, in order
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.steps.iter().filter_map(|step| match step {
            Step::Send { message, .. } => Some(message),
            Step::AwaitReply => None,
        })
    }

    /// Number of reply waits
    pub fn reply_waits(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, Step::AwaitReply))
            .count()
    }

    pub(crate) fn into_steps(self) -> (String, Vec<Step>) {
        (self.name, self.steps)
    }
}
