//! Error types for the signaling simulator
//!
//! A rejected `start` is a normal protocol outcome and never shows up here.
//! These variants cover the faults around it: a broken channel, a reply that
//! does not decode, a scenario that cannot be negotiated, a bad config file.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the signaling simulator
#[derive(Error, Debug)]
pub enum Error {
    // === Channel Errors ===
    #[error("Channel closed: the {0} side is gone")]
    ChannelClosed(&'static str),

    #[error("No reply from the counterpart after {0} ms")]
    ReplyTimeout(u64),

    #[error("Background task failed: {0}")]
    Task(String),

    // === Negotiation Errors ===
    #[error("Counterpart rejected every preferred technology: {0}")]
    NegotiationExhausted(String),

    #[error("Unknown technology '{0}'. Expected 'WebRTC' or 'VNC'")]
    UnknownTechnology(String),

    #[error("Technology '{0}' is not in the preference list")]
    NotPreferred(String),

    #[error("Cannot {action} while negotiation is {state}")]
    InvalidTransition { action: String, state: String },

    // === Scenario Errors ===
    #[error("Unknown scenario '{name}'. Available: {available}")]
    UnknownScenario { name: String, available: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),
}

impl Error {
    /// Create an invalid transition error
    pub fn invalid_transition(action: &str, state: &str) -> Self {
        Self::InvalidTransition {
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    /// Create an unknown scenario error listing the known names
    pub fn unknown_scenario<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownScenario {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
