//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

use colored::Colorize;

use crate::channel::{pair, EchoResponder};
use crate::commands::Commands;
use crate::common::config::Timing;
use crate::common::{Config, Error, Result};
use crate::protocol::Technology;
use crate::scenario::{catalog, entities_for, ScenarioKind};
use crate::testing;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Run {
            scenario,
            no_delay,
            timeout_ms,
        } => {
            let kind: ScenarioKind = scenario.parse()?;
            if no_delay {
                config.timing = Timing::immediate();
            }
            if timeout_ms.is_some() {
                config.driver.reply_timeout_ms = timeout_ms;
            }

            let (mut channel, sut) = pair();
            let responder = EchoResponder::new(sut, config.responder.reply_on.clone()).spawn();

            let transcript = kind.run(&mut channel, &config).await?;
            drop(channel);
            let received = responder.finish().await?;

            for text in &transcript.sent {
                println!("{}", text);
            }

            tracing::info!(
                scenario = %kind,
                delivered = received.len(),
                replies = transcript.replies.len(),
                "Done"
            );
            Ok(())
        }

        Commands::List => {
            for kind in ScenarioKind::ALL {
                println!("{:<22} {}", kind.name().bold(), kind.description());
            }
            Ok(())
        }

        Commands::Catalog { technology } => {
            let entities = match technology {
                Some(t) => entities_for(t.parse::<Technology>()?),
                None => catalog(),
            };
            let text = serde_json::to_string_pretty(&entities)?;
            println!("{}", text);
            Ok(())
        }

        Commands::Test {
            path,
            verbose,
            no_delay,
        } => {
            if no_delay {
                config.timing = Timing::immediate();
            }

            let result = testing::run_scenario(&path, &config, verbose).await?;
            if result.passed {
                Ok(())
            } else {
                Err(Error::TestAssertion(format!(
                    "'{}' failed at step {}/{}: {}",
                    result.name,
                    result.steps_run,
                    result.steps_total,
                    result.error.unwrap_or_else(|| "unknown error".to_string())
                )))
            }
        }
    }
}
