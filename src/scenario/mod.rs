//! Scripted negotiation scenarios
//!
//! A scenario is an ordered list of timed sends and reply waits. The
//! [`Driver`] executes one against a [`SignalChannel`](crate::channel::SignalChannel);
//! the named presenter/participant scenarios are built by [`ScenarioKind`].

pub mod builtin;
pub mod catalog;
pub mod driver;
pub mod negotiation;
pub mod step;

pub use builtin::{participant, presenter_vnc, presenter_vnc_mobile, presenter_webrtc, ScenarioKind};
pub use catalog::{catalog, entities_for};
pub use driver::{Driver, Transcript};
pub use negotiation::{Negotiation, NegotiationState};
pub use step::{Scenario, Step};
