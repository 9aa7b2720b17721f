//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::common::{Error, Result};
use crate::protocol::{Message, MessageKind};
use crate::scenario::{Scenario, ScenarioKind, Step};

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// Run a named scenario instead of `steps`
    pub builtin: Option<String>,
    /// The sequence of steps to execute
    #[serde(default)]
    pub steps: Vec<TestStep>,
    /// Inbound message kinds the simulated counterpart replies to
    pub reply_on: Option<Vec<MessageKind>>,
    /// Give up on a reply wait after this many milliseconds
    /// (default: the configured driver timeout, else 30000)
    pub timeout_ms: Option<u64>,
    /// Expectations on the whole run
    pub expect: Option<RunExpectation>,
}

/// A single test step in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Deliver a message to the system under test
    Send {
        /// Delay after the previous step, in milliseconds
        #[serde(default)]
        delay_ms: u64,
        /// The message to deliver
        message: Message,
    },
    /// Wait for one reply from the system under test
    AwaitReply {
        /// Expected reply properties
        expect: Option<ReplyExpectation>,
    },
}

/// Expectations for a reply
#[derive(Deserialize, Debug)]
pub struct ReplyExpectation {
    /// Expected `type` tag of the reply
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// JSON the reply must contain (object keys are matched as a subset)
    pub contains: Option<Value>,
}

/// Expectations for a whole run
#[derive(Deserialize, Debug)]
pub struct RunExpectation {
    /// Number of messages the system under test received
    pub sent: Option<usize>,
    /// Number of replies the driver consumed
    pub replies: Option<usize>,
    /// Kind of the last message the system under test received
    pub last: Option<MessageKind>,
}

/// Default reply wait for test runs, so a silent counterpart fails the test
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

impl TestScenario {
    /// Parse a scenario from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse test scenario: {}", e)))
    }

    /// Reply wait for this file: its own `timeout_ms`, then `fallback`
    /// (the configured driver timeout), then 30 s
    pub fn reply_timeout(&self, fallback: Option<Duration>) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .or(fallback)
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    /// The named scenario this file runs, if any
    pub fn builtin_kind(&self) -> Result<Option<ScenarioKind>> {
        self.builtin.as_deref().map(str::parse).transpose()
    }

    /// Build the step list for the inline `steps`
    pub fn to_scenario(&self) -> Result<Scenario> {
        if self.steps.is_empty() {
            return Err(Error::Config(format!(
                "Test scenario '{}' has neither 'builtin' nor 'steps'",
                self.name
            )));
        }

        Ok(self
            .steps
            .iter()
            .fold(Scenario::new(self.name.clone()), |scenario, step| {
                scenario.step(match step {
                    TestStep::Send { delay_ms, message } => Step::Send {
                        delay: Duration::from_millis(*delay_ms),
                        message: message.clone(),
                    },
                    TestStep::AwaitReply { .. } => Step::AwaitReply,
                })
            }))
    }

    /// Reply expectations in the order of the reply waits
    pub fn reply_expectations(&self) -> Vec<Option<&ReplyExpectation>> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                TestStep::AwaitReply { expect } => Some(expect.as_ref()),
                TestStep::Send { .. } => None,
            })
            .collect()
    }
}
