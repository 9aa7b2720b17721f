//! Signaling message types
//!
//! Every message is a JSON object tagged by its `type` field. Field names on
//! the wire follow the counterpart's camelCase convention (`isMobile`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// A signaling message exchanged between presenter and participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Declares which side of the session this peer plays
    Role { role: Role },

    /// Sharing technologies in priority order, most preferred first
    Preferences { technologies: Vec<Technology> },

    /// Answer to a session start request
    Start {
        answer: Answer,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        technology: Option<Technology>,
        #[serde(
            rename = "isMobile",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        is_mobile: Option<bool>,
    },

    /// Catalog of shareable entities, published once a session is accepted
    Config { entities: Vec<Entity> },
}

impl Message {
    pub fn role(role: Role) -> Self {
        Self::Role { role }
    }

    pub fn preferences(technologies: Vec<Technology>) -> Self {
        Self::Preferences { technologies }
    }

    /// A rejected start for the given technology
    pub fn start_error(technology: Technology) -> Self {
        Self::Start {
            answer: Answer::Error,
            technology: Some(technology),
            is_mobile: None,
        }
    }

    /// An accepted start for the given technology
    pub fn start_acknowledge(technology: Technology, is_mobile: Option<bool>) -> Self {
        Self::Start {
            answer: Answer::Acknowledge,
            technology: Some(technology),
            is_mobile,
        }
    }

    pub fn config(entities: Vec<Entity>) -> Self {
        Self::Config { entities }
    }

    /// The wire discriminant of this message
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Role { .. } => MessageKind::Role,
            Self::Preferences { .. } => MessageKind::Preferences,
            Self::Start { .. } => MessageKind::Start,
            Self::Config { .. } => MessageKind::Config,
        }
    }
}

/// Discriminant of [`Message`], as it appears in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Role,
    Preferences,
    Start,
    Config,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Preferences => "preferences",
            Self::Start => "start",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Offers a window or screen for sharing
    Presenter,
    /// Receives what the presenter shares
    Participant,
}

/// Sharing transport subject to negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "WebRTC")]
    WebRtc,
    #[serde(rename = "VNC")]
    Vnc,
}

impl Technology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebRtc => "WebRTC",
            Self::Vnc => "VNC",
        }
    }

    /// Whether this technology can share individual windows.
    /// WebRTC sessions share whole screens only.
    pub fn shares_windows(&self) -> bool {
        matches!(self, Self::Vnc)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webrtc" => Ok(Self::WebRtc),
            "vnc" => Ok(Self::Vnc),
            _ => Err(Error::UnknownTechnology(s.to_string())),
        }
    }
}

/// Answer carried by a `start` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Acknowledge,
    Error,
}

/// A shareable unit published in a `config` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier within the catalog
    pub id: String,
    /// Human-readable title
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

/// Kind of shareable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Window,
    Screen,
}
