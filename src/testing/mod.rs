//! Scenario test runner
//!
//! Reads YAML test scenarios, runs them against the echo responder and
//! asserts on the decoded replies and on what the counterpart received.

mod config;
mod runner;

pub use config::*;
pub use runner::{run_scenario, run_test, TestResult};
