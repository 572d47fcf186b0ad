//! Submission dialog for market-relay.
//!
//! This crate provides:
//!
//! - **Session Store**: One conversation session per active user
//! - **Flow Controller**: The name → price → photo state machine
//! - **Events and replies**: What the transport delivers and what the
//!   dialog asks it to send back

pub mod error;
pub mod event;
pub mod flow;
pub mod reply;
pub mod session;
pub mod store;

pub use error::FlowError;
pub use event::{Command, InboundEvent, PhotoRef, PhotoVariant, Sender};
pub use flow::{FlowController, FlowInput, FlowOutcome, Transition, TransitionEffect, transition};
pub use reply::OutboundAction;
pub use session::{CollectedListing, ConversationSession, FinishedSubmission, SessionState};
pub use store::SessionStore;
