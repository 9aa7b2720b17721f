//! Named negotiation scenarios
//!
//! Four variants of the same protocol, differing in the negotiated outcome.
//! Each is rebuilt from scratch on every run.

use std::fmt;
use std::str::FromStr;

use crate::channel::SignalChannel;
use crate::common::config::{Config, Timing};
use crate::common::{Error, Result};
use crate::protocol::{Message, MessageKind, Role, Technology};

use super::driver::{Driver, Transcript};
use super::negotiation::Negotiation;
use super::step::Scenario;

/// The named scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// WebRTC is rejected, VNC is accepted, the full catalog is published
    PresenterVnc,
    /// WebRTC is accepted at once, screens are published
    PresenterWebRtc,
    /// WebRTC is rejected, VNC is accepted for a mobile session, no catalog
    PresenterVncMobile,
    /// Role declaration only
    Participant,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        Self::PresenterVnc,
        Self::PresenterWebRtc,
        Self::PresenterVncMobile,
        Self::Participant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::PresenterVnc => "presenter-vnc",
            Self::PresenterWebRtc => "presenter-webrtc",
            Self::PresenterVncMobile => "presenter-vnc-mobile",
            Self::Participant => "participant",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PresenterVnc => {
                "Presenter prefers WebRTC, is rejected, retries with VNC and shares all entities"
            }
            Self::PresenterWebRtc => "Presenter negotiates WebRTC directly and shares screens only",
            Self::PresenterVncMobile => {
                "Presenter prefers VNC, WebRTC is rejected, VNC is accepted for a mobile session"
            }
            Self::Participant => "Participant declares its role and nothing else",
        }
    }

    /// Build this scenario's step list
    pub fn build(&self, timing: Timing) -> Result<Scenario> {
        let name = self.name();
        match self {
            Self::PresenterVnc => Negotiation::presenter(
                name,
                vec![Technology::WebRtc, Technology::Vnc],
                timing,
            )
            .reject(Technology::WebRtc)?
            .accept(false)?
            .into_scenario(),

            Self::PresenterWebRtc => Negotiation::presenter(
                name,
                vec![Technology::WebRtc, Technology::Vnc],
                timing,
            )
            .accept(false)?
            .into_scenario(),

            Self::PresenterVncMobile => Negotiation::presenter(
                name,
                vec![Technology::Vnc, Technology::WebRtc],
                timing,
            )
            .reject(Technology::WebRtc)?
            .accept(true)?
            .into_scenario(),

            Self::Participant => Ok(Scenario::new(name).send(
                timing.before(MessageKind::Role),
                Message::role(Role::Participant),
            )),
        }
    }

    /// Build and run this scenario with the given settings
    pub async fn run(
        &self,
        channel: &mut dyn SignalChannel,
        config: &Config,
    ) -> Result<Transcript> {
        let scenario = self.build(config.timing)?;
        Driver::new(channel)
            .with_reply_timeout(config.driver.reply_timeout())
            .run(scenario)
            .await
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                Error::unknown_scenario(s, &names)
            })
    }
}

async fn run_default(kind: ScenarioKind, channel: &mut dyn SignalChannel) -> Result<()> {
    kind.run(channel, &Config::default()).await.map(|_| ())
}

/// Presenter, VNC+WebRTC, negotiation with retry
pub async fn presenter_vnc(channel: &mut dyn SignalChannel) -> Result<()> {
    run_default(ScenarioKind::PresenterVnc, channel).await
}

/// Presenter, WebRTC only
pub async fn presenter_webrtc(channel: &mut dyn SignalChannel) -> Result<()> {
    run_default(ScenarioKind::PresenterWebRtc, channel).await
}

/// Presenter, VNC mobile fallback
pub async fn presenter_vnc_mobile(channel: &mut dyn SignalChannel) -> Result<()> {
    run_default(ScenarioKind::PresenterVncMobile, channel).await
}

/// Participant
pub async fn participant(channel: &mut dyn SignalChannel) -> Result<()> {
    run_default(ScenarioKind::Participant, channel).await
}
