//! Test runner implementation
//!
//! Executes test scenarios against the echo responder and checks the
//! structured replies rather than any printed output.

use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use crate::channel::{pair, EchoResponder};
use crate::common::{Config, Error, Result};
use crate::protocol::{codec, Message};
use crate::scenario::{Driver, Step, Transcript};

use super::config::{ReplyExpectation, RunExpectation, TestScenario};

/// Result of a test run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    /// Messages the system under test received
    pub delivered: usize,
    pub error: Option<String>,
}

/// Run a test scenario from a YAML file
pub async fn run_scenario(path: &Path, config: &Config, verbose: bool) -> Result<TestResult> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let test = TestScenario::parse(&content)?;
    run_test(&test, config, verbose).await
}

/// Run an already-parsed test scenario
///
/// Steps run one at a time and the run stops at the first step that fails,
/// so nothing after a failed reply check reaches the system under test.
pub async fn run_test(test: &TestScenario, config: &Config, verbose: bool) -> Result<TestResult> {
    let scenario = match test.builtin_kind()? {
        Some(kind) => kind.build(config.timing)?,
        None => test.to_scenario()?,
    };
    let steps_total = scenario.steps().len();

    println!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        test.name.white().bold()
    );

    if let Some(desc) = &test.description {
        println!("  {}", desc.dimmed());
    }

    let reply_on = test
        .reply_on
        .clone()
        .unwrap_or_else(|| config.responder.reply_on.clone());

    let (mut channel, sut) = pair();
    let responder = EchoResponder::new(sut, reply_on).spawn();

    println!("\n{}", "Steps:".cyan());

    let expectations = test.reply_expectations();
    let mut transcript = Transcript::default();
    let mut failure = None;
    let mut steps_run = 0;

    {
        let mut driver = Driver::new(&mut channel)
            .with_reply_timeout(Some(test.reply_timeout(config.driver.reply_timeout())));

        for (i, step) in scenario.steps().iter().enumerate() {
            let step_num = i + 1;
            steps_run = step_num;

            let outcome = match driver.execute(step, step_num, &mut transcript).await {
                Ok(()) => match step {
                    Step::Send { message, .. } => {
                        report_send(message, step_num, verbose);
                        Ok(())
                    }
                    Step::AwaitReply => {
                        let index = transcript.replies.len() - 1;
                        let expect = expectations.get(index).copied().flatten();
                        check_reply(&transcript.replies[index], expect, step_num, verbose)
                    }
                },
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                println!("  {} Step {}: {}", "✗".red(), step_num, e);
                failure = Some(e.to_string());
                break;
            }
        }
    }

    // Closing the driver end lets the responder drain and stop
    drop(channel);
    let received = responder.finish().await?;

    if failure.is_none() {
        if let Some(expect) = &test.expect {
            if let Err(e) = check_run(expect, &transcript, &received) {
                println!("  {} Run: {}", "✗".red(), e);
                failure = Some(e.to_string());
            }
        }
    }

    if failure.is_none() {
        println!(
            "\n{} {}\n",
            "✓".green().bold(),
            "Test Passed".green().bold()
        );
    }

    Ok(TestResult {
        name: test.name.clone(),
        passed: failure.is_none(),
        steps_run,
        steps_total,
        delivered: received.len(),
        error: failure,
    })
}

fn report_send(message: &Message, step_num: usize, verbose: bool) {
    let label = format!("send {}", message.kind());
    if verbose {
        let wire = codec::encode(message).unwrap_or_default();
        println!(
            "  {} Step {}: {} {}",
            "✓".green(),
            step_num,
            label,
            wire.dimmed()
        );
    } else {
        println!("  {} Step {}: {}", "✓".green(), step_num, label);
    }
}

/// Check one reply against its expectation
fn check_reply(
    reply: &Value,
    expect: Option<&ReplyExpectation>,
    step_num: usize,
    verbose: bool,
) -> Result<()> {
    let actual_type = codec::reply_type(reply).unwrap_or("");

    if let Some(exp) = expect {
        if let Some(expected_type) = &exp.kind {
            if actual_type != expected_type {
                return Err(Error::TestAssertion(format!(
                    "Expected reply type '{}', got '{}'",
                    expected_type, actual_type
                )));
            }
        }

        if let Some(expected) = &exp.contains {
            if !json_contains(reply, expected) {
                return Err(Error::TestAssertion(format!(
                    "Reply {} does not contain {}",
                    reply, expected
                )));
            }
        }
    }

    if verbose {
        println!(
            "  {} Step {}: await reply {}",
            "✓".green(),
            step_num,
            reply.to_string().dimmed()
        );
    } else {
        println!(
            "  {} Step {}: await reply ({})",
            "✓".green(),
            step_num,
            actual_type.dimmed()
        );
    }

    Ok(())
}

/// Check whole-run expectations
fn check_run(
    expect: &RunExpectation,
    transcript: &Transcript,
    received: &[Message],
) -> Result<()> {
    if let Some(sent) = expect.sent {
        if received.len() != sent {
            return Err(Error::TestAssertion(format!(
                "Expected {} messages delivered, got {}",
                sent,
                received.len()
            )));
        }
    }

    if let Some(replies) = expect.replies {
        if transcript.replies.len() != replies {
            return Err(Error::TestAssertion(format!(
                "Expected {} replies, got {}",
                replies,
                transcript.replies.len()
            )));
        }
    }

    if let Some(last) = expect.last {
        let actual = received.last().map(|m| m.kind());
        if actual != Some(last) {
            return Err(Error::TestAssertion(format!(
                "Expected last message '{}', got {}",
                last,
                actual.map_or_else(|| "nothing".to_string(), |k| format!("'{}'", k))
            )));
        }
    }

    Ok(())
}

/// Whether `actual` contains `expected`: objects match on a subset of keys,
/// arrays element by element, everything else by equality
fn json_contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected
            .iter()
            .all(|(key, value)| actual.get(key).is_some_and(|a| json_contains(a, value))),
        (Value::Array(actual), Value::Array(expected)) => {
            actual.len() == expected.len()
                && actual
                    .iter()
                    .zip(expected)
                    .all(|(a, e)| json_contains(a, e))
        }
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_contains_subset() {
        let reply = json!({"type": "start", "answer": "error", "technology": "WebRTC"});
        assert!(json_contains(&reply, &json!({"technology": "WebRTC"})));
        assert!(!json_contains(&reply, &json!({"technology": "VNC"})));
        assert!(!json_contains(&reply, &json!({"isMobile": false})));
    }

    #[test]
    fn test_json_contains_arrays_are_ordered() {
        let reply = json!({"technologies": ["WebRTC", "VNC"]});
        assert!(json_contains(&reply, &json!({"technologies": ["WebRTC", "VNC"]})));
        assert!(!json_contains(&reply, &json!({"technologies": ["VNC", "WebRTC"]})));
        assert!(!json_contains(&reply, &json!({"technologies": ["WebRTC"]})));
    }

    #[test]
    fn test_check_reply_type_mismatch() {
        let expect = ReplyExpectation {
            kind: Some("start".to_string()),
            contains: None,
        };
        let err = check_reply(&json!({"type": "preferences"}), Some(&expect), 3, false)
            .unwrap_err();
        assert!(matches!(err, Error::TestAssertion(_)));
    }

    #[tokio::test]
    async fn test_run_builtin_passes() {
        let test = TestScenario::parse(
            r#"
name: retry
builtin: presenter-vnc
expect:
  sent: 5
  replies: 2
  last: config
"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.timing = crate::common::config::Timing::immediate();

        let result = run_test(&test, &config, false).await.unwrap();
        assert!(result.passed, "{:?}", result.error);
        assert_eq!(result.steps_run, result.steps_total);
    }

    #[tokio::test]
    async fn test_run_fails_on_wrong_reply_type() {
        let test = TestScenario::parse(
            r#"
name: wrong reply
steps:
  - action: send
    message: { type: preferences, technologies: [VNC] }
  - action: await_reply
    expect: { type: start }
"#,
        )
        .unwrap();

        let result = run_test(&test, &Config::default(), false).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.steps_run, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_counterpart_times_out() {
        let test = TestScenario::parse(
            r#"
name: silent
reply_on: []
timeout_ms: 100
steps:
  - action: send
    message: { type: role, role: presenter }
  - action: await_reply
"#,
        )
        .unwrap();

        let result = run_test(&test, &Config::default(), false).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.steps_run, 2);
        assert!(result.error.unwrap().contains("100 ms"));
    }

    #[tokio::test]
    async fn test_failed_reply_check_stops_later_sends() {
        let test = TestScenario::parse(
            r#"
name: stop at failure
reply_on: [preferences]
steps:
  - action: send
    message: { type: preferences, technologies: [WebRTC, VNC] }
  - action: await_reply
    expect: { type: start }
  - action: send
    message: { type: start, answer: acknowledge, technology: WebRTC }
  - action: send
    message: { type: config, entities: [] }
"#,
        )
        .unwrap();

        let result = run_test(&test, &Config::default(), false).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.steps_run, 2);
        assert_eq!(result.steps_total, 4);
        // Only the send before the failed wait reached the counterpart
        assert_eq!(result.delivered, 1);
        assert!(result
            .error
            .unwrap()
            .contains("Expected reply type 'start', got 'preferences'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_reply_timeout_applies() {
        let test = TestScenario::parse(
            r#"
name: silent
reply_on: []
steps:
  - action: send
    message: { type: role, role: presenter }
  - action: await_reply
"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.driver.reply_timeout_ms = Some(200);

        let result = run_test(&test, &config, false).await.unwrap();
        assert!(!result.passed);
        assert!(result.error.unwrap().contains("200 ms"));
    }

    #[tokio::test]
    async fn test_missing_scenario_file() {
        let path = std::env::temp_dir().join("signal-sim-no-such-scenario.yaml");
        let err = run_scenario(&path, &Config::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
