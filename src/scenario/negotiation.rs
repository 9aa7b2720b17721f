//! Presenter negotiation state machine
//!
//! Builds the step list of a presenter scenario while tracking where the
//! negotiation stands:
//!
//! ```text
//! RoleDeclared -> PreferencesSent -> AwaitingTechnologyDecision
//!     -> Rejected -> AwaitingTechnologyDecision -> ...
//!     -> Accepted -> ConfigPublished
//! ```
//!
//! `Accepted` is terminal only for mobile sessions, which publish no
//! catalog. Every `start` answer is preceded by a reply wait.

use std::fmt;

use crate::common::config::Timing;
use crate::common::{Error, Result};
use crate::protocol::{Message, MessageKind, Role, Technology};

use super::catalog::entities_for;
use super::step::{Scenario, Step};

/// Where a presenter negotiation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    RoleDeclared,
    PreferencesSent,
    AwaitingTechnologyDecision,
    Rejected(Technology),
    Accepted { technology: Technology, mobile: bool },
    ConfigPublished(Technology),
}

impl NegotiationState {
    /// Whether the negotiation may end here
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Accepted { mobile: true, .. } | Self::ConfigPublished(_)
        )
    }

    /// Whether the next step is waiting for a technology decision
    fn expects_decision(&self) -> bool {
        matches!(self, Self::PreferencesSent | Self::Rejected(_))
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoleDeclared => write!(f, "at role declared"),
            Self::PreferencesSent => write!(f, "at preferences sent"),
            Self::AwaitingTechnologyDecision => write!(f, "awaiting a technology decision"),
            Self::Rejected(t) => write!(f, "rejected for {}", t),
            Self::Accepted { technology, mobile } => {
                if *mobile {
                    write!(f, "accepted for mobile {}", technology)
                } else {
                    write!(f, "accepted for {}", technology)
                }
            }
            Self::ConfigPublished(t) => write!(f, "finished with a {} catalog", t),
        }
    }
}

/// Step-list builder for one presenter negotiation
pub struct Negotiation {
    state: NegotiationState,
    preferences: Vec<Technology>,
    rejected: Vec<Technology>,
    timing: Timing,
    scenario: Scenario,
}

impl Negotiation {
    /// Declare the presenter role and send `preferences`
    pub fn presenter(
        name: impl Into<String>,
        preferences: Vec<Technology>,
        timing: Timing,
    ) -> Self {
        let scenario = Scenario::new(name).send(
            timing.before(MessageKind::Role),
            Message::role(Role::Presenter),
        );

        let mut negotiation = Self {
            state: NegotiationState::RoleDeclared,
            preferences: Vec::new(),
            rejected: Vec::new(),
            timing,
            scenario,
        };
        negotiation.send_preferences(preferences);
        negotiation
    }

    fn send_preferences(&mut self, preferences: Vec<Technology>) {
        let message = Message::preferences(preferences.clone());
        self.push_send(message);
        self.preferences = preferences;
        self.state = NegotiationState::PreferencesSent;
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Highest-priority preference the counterpart has not rejected yet
    pub fn next_technology(&self) -> Option<Technology> {
        self.preferences
            .iter()
            .copied()
            .find(|t| !self.rejected.contains(t))
    }

    /// Wait for the counterpart, then reject `technology`
    pub fn reject(mut self, technology: Technology) -> Result<Self> {
        self.await_decision("reject a technology")?;

        if !self.preferences.contains(&technology) {
            return Err(Error::NotPreferred(technology.to_string()));
        }
        if self.rejected.contains(&technology) {
            return Err(Error::invalid_transition(
                &format!("reject {} twice", technology),
                &self.state.to_string(),
            ));
        }

        tracing::trace!(%technology, "negotiation: reject");
        self.push_send(Message::start_error(technology));
        self.rejected.push(technology);
        self.state = NegotiationState::Rejected(technology);
        Ok(self)
    }

    /// Wait for the counterpart, then accept the next technology in priority
    /// order. Unless the session is mobile, the catalog follows.
    ///
    /// VNC acknowledgements always carry `isMobile`; WebRTC ones never do,
    /// and a mobile WebRTC session is refused.
    pub fn accept(mut self, mobile: bool) -> Result<Self> {
        self.await_decision("accept a technology")?;

        let technology = self.next_technology().ok_or_else(|| {
            Error::NegotiationExhausted(
                self.preferences
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let is_mobile = match technology {
            Technology::Vnc => Some(mobile),
            Technology::WebRtc if mobile => {
                return Err(Error::invalid_transition(
                    "accept a mobile session",
                    "negotiating WebRTC",
                ))
            }
            Technology::WebRtc => None,
        };

        tracing::trace!(%technology, mobile, "negotiation: accept");
        self.push_send(Message::start_acknowledge(technology, is_mobile));
        self.state = NegotiationState::Accepted { technology, mobile };

        if !mobile {
            self.push_send(Message::config(entities_for(technology)));
            self.state = NegotiationState::ConfigPublished(technology);
        }
        Ok(self)
    }

    /// Finish the negotiation and return its scenario
    pub fn into_scenario(self) -> Result<Scenario> {
        if !self.state.is_terminal() {
            return Err(Error::invalid_transition(
                "finish the scenario",
                &self.state.to_string(),
            ));
        }
        Ok(self.scenario)
    }

    fn await_decision(&mut self, action: &str) -> Result<()> {
        if !self.state.expects_decision() {
            return Err(Error::invalid_transition(action, &self.state.to_string()));
        }
        self.scenario.push(Step::AwaitReply);
        self.state = NegotiationState::AwaitingTechnologyDecision;
        Ok(())
    }

    fn push_send(&mut self, message: Message) {
        let delay = self.timing.before(message.kind());
        self.scenario.push(Step::Send { delay, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Answer;

    fn start_technologies(scenario: &Scenario) -> Vec<(Answer, Technology)> {
        scenario
            .messages()
            .filter_map(|m| match m {
                Message::Start {
                    answer,
                    technology: Some(t),
                    ..
                } => Some((*answer, *t)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_retry_picks_highest_unrejected_preference() {
        let negotiation = Negotiation::presenter(
            "retry",
            vec![Technology::Vnc, Technology::WebRtc],
            Timing::immediate(),
        )
        .reject(Technology::Vnc)
        .unwrap();
        assert_eq!(negotiation.next_technology(), Some(Technology::WebRtc));

        let scenario = negotiation.accept(false).unwrap().into_scenario().unwrap();
        assert_eq!(
            start_technologies(&scenario),
            vec![
                (Answer::Error, Technology::Vnc),
                (Answer::Acknowledge, Technology::WebRtc)
            ]
        );
    }

    #[test]
    fn test_rejecting_lower_priority_keeps_top_choice() {
        let negotiation = Negotiation::presenter(
            "fallback",
            vec![Technology::Vnc, Technology::WebRtc],
            Timing::immediate(),
        )
        .reject(Technology::WebRtc)
        .unwrap();
        assert_eq!(negotiation.next_technology(), Some(Technology::Vnc));
    }

    #[test]
    fn test_each_decision_is_preceded_by_a_reply_wait() {
        let scenario = Negotiation::presenter(
            "waits",
            vec![Technology::WebRtc, Technology::Vnc],
            Timing::immediate(),
        )
        .reject(Technology::WebRtc)
        .unwrap()
        .accept(false)
        .unwrap()
        .into_scenario()
        .unwrap();

        let steps = scenario.steps();
        assert_eq!(scenario.reply_waits(), 2);
        for (i, step) in steps.iter().enumerate() {
            if let Step::Send {
                message: Message::Start { .. },
                ..
            } = step
            {
                assert_eq!(steps[i - 1], Step::AwaitReply);
            }
        }
    }

    #[test]
    fn test_exhausted_preferences() {
        let err = Negotiation::presenter("exhausted", vec![Technology::WebRtc], Timing::immediate())
            .reject(Technology::WebRtc)
            .unwrap()
            .accept(false)
            .err()
            .unwrap();
        assert!(matches!(err, Error::NegotiationExhausted(_)));
    }

    #[test]
    fn test_reject_outside_preferences() {
        let err = Negotiation::presenter("vnc-only", vec![Technology::Vnc], Timing::immediate())
            .reject(Technology::WebRtc)
            .err()
            .unwrap();
        assert!(matches!(err, Error::NotPreferred(_)));
    }

    #[test]
    fn test_reject_twice() {
        let err = Negotiation::presenter(
            "twice",
            vec![Technology::WebRtc, Technology::Vnc],
            Timing::immediate(),
        )
        .reject(Technology::WebRtc)
        .unwrap()
        .reject(Technology::WebRtc)
        .err()
        .unwrap();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn test_mobile_webrtc_refused() {
        let err = Negotiation::presenter(
            "mobile-webrtc",
            vec![Technology::WebRtc],
            Timing::immediate(),
        )
        .accept(true)
        .err()
        .unwrap();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn test_unfinished_negotiation_has_no_scenario() {
        let negotiation = Negotiation::presenter(
            "unfinished",
            vec![Technology::WebRtc, Technology::Vnc],
            Timing::immediate(),
        );
        assert_eq!(negotiation.state(), NegotiationState::PreferencesSent);
        assert!(negotiation.into_scenario().is_err());
    }

    #[test]
    fn test_no_decisions_after_acceptance() {
        let accepted = Negotiation::presenter("done", vec![Technology::Vnc], Timing::immediate())
            .accept(true)
            .unwrap();
        assert_eq!(
            accepted.state(),
            NegotiationState::Accepted {
                technology: Technology::Vnc,
                mobile: true
            }
        );
        assert!(accepted.reject(Technology::Vnc).is_err());
    }
}
