//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};
use crate::protocol::MessageKind;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Delays before each scripted message
    #[serde(default)]
    pub timing: Timing,

    /// Driver settings
    #[serde(default)]
    pub driver: DriverConfig,

    /// Echo responder settings
    #[serde(default)]
    pub responder: ResponderConfig,
}

/// Delay before each kind of message, in milliseconds
///
/// Each delay is measured from the completion of the previous step.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    #[serde(default = "default_role_ms")]
    pub role_ms: u64,

    #[serde(default = "default_preferences_ms")]
    pub preferences_ms: u64,

    #[serde(default = "default_start_ms")]
    pub start_ms: u64,

    #[serde(default = "default_config_ms")]
    pub config_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            role_ms: default_role_ms(),
            preferences_ms: default_preferences_ms(),
            start_ms: default_start_ms(),
            config_ms: default_config_ms(),
        }
    }
}

impl Timing {
    /// No delays at all, for fast runs and tests
    pub fn immediate() -> Self {
        Self {
            role_ms: 0,
            preferences_ms: 0,
            start_ms: 0,
            config_ms: 0,
        }
    }

    /// Delay before a message of the given kind
    pub fn before(&self, kind: MessageKind) -> Duration {
        let ms = match kind {
            MessageKind::Role => self.role_ms,
            MessageKind::Preferences => self.preferences_ms,
            MessageKind::Start => self.start_ms,
            MessageKind::Config => self.config_ms,
        };
        Duration::from_millis(ms)
    }
}

fn default_role_ms() -> u64 {
    500
}
fn default_preferences_ms() -> u64 {
    1000
}
fn default_start_ms() -> u64 {
    500
}
fn default_config_ms() -> u64 {
    1000
}

/// Driver configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DriverConfig {
    /// Give up waiting for a reply after this many milliseconds.
    /// Unset means wait forever.
    #[serde(default)]
    pub reply_timeout_ms: Option<u64>,
}

impl DriverConfig {
    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout_ms.map(Duration::from_millis)
    }
}

/// Echo responder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ResponderConfig {
    /// Inbound message kinds the responder answers
    #[serde(default = "default_reply_on")]
    pub reply_on: Vec<MessageKind>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            reply_on: default_reply_on(),
        }
    }
}

fn default_reply_on() -> Vec<MessageKind> {
    vec![MessageKind::Preferences, MessageKind::Start]
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.timing.before(MessageKind::Role), Duration::from_millis(500));
        assert_eq!(
            config.timing.before(MessageKind::Preferences),
            Duration::from_millis(1000)
        );
        assert!(config.driver.reply_timeout().is_none());
        assert_eq!(
            config.responder.reply_on,
            vec![MessageKind::Preferences, MessageKind::Start]
        );
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(
            r#"
            [timing]
            start_ms = 20

            [driver]
            reply_timeout_ms = 1500

            [responder]
            reply_on = ["role"]
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.start_ms, 20);
        assert_eq!(config.timing.config_ms, 1000);
        assert_eq!(
            config.driver.reply_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(config.responder.reply_on, vec![MessageKind::Role]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[timing\nrole_ms = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/signal-sim.toml")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
