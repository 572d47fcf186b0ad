//! The submission dialog state machine.
//!
//! | State           | Input        | Next            | Effect                      |
//! |-----------------|--------------|-----------------|-----------------------------|
//! | any             | `/start`     | `AwaitingName`  | greet, prompt for name      |
//! | any             | `/sell`      | `AwaitingName`  | prompt for name             |
//! | active          | `/cancel`    | `Idle`          | discard, confirm            |
//! | `AwaitingName`  | text         | `AwaitingPrice` | store name, prompt price    |
//! | `AwaitingPrice` | text         | `AwaitingPhoto` | store price, prompt photo   |
//! | `AwaitingPhoto` | photo        | `Idle`          | finish submission           |
//!
//! Every other combination is [`FlowError::InvalidEventForState`] and is
//! dropped without a reply.

use crate::error::FlowError;
use crate::event::{Command, InboundEvent, PhotoVariant};
use crate::reply::OutboundAction;
use crate::session::{FinishedSubmission, SessionState};
use crate::store::SessionStore;
use chrono::Utc;
use market_relay_locale::MessageKey;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The kind of input an event presents to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowInput {
    /// `/start`.
    Start,
    /// `/sell`.
    Sell,
    /// `/cancel`.
    Cancel,
    /// Any other command.
    OtherCommand,
    /// Plain text.
    Text,
    /// A photo.
    Photo,
}

impl FlowInput {
    /// Classifies a message event. Callbacks are not dialog input.
    #[must_use]
    pub fn of(event: &InboundEvent) -> Option<Self> {
        match event {
            InboundEvent::Text { .. } => Some(Self::Text),
            InboundEvent::Photo { .. } => Some(Self::Photo),
            InboundEvent::Command { command, .. } => Some(match command {
                Command::Start => Self::Start,
                Command::Sell => Self::Sell,
                Command::Cancel => Self::Cancel,
                Command::Other(_) => Self::OtherCommand,
            }),
            InboundEvent::Callback { .. } => None,
        }
    }

    /// Returns the input name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Sell => "sell",
            Self::Cancel => "cancel",
            Self::OtherCommand => "command",
            Self::Text => "text",
            Self::Photo => "photo",
        }
    }
}

/// What a transition does to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Discard collected data and ask for the name, optionally greeting first.
    PromptName { greet: bool },
    /// Store the text as the name and ask for the price.
    StoreName,
    /// Store the text as the price and ask for the photo.
    StorePrice,
    /// Take the photo and produce the finished submission.
    Complete,
    /// Discard the dialog.
    Abandon,
}

/// A permitted move in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The state after the move.
    pub next: SessionState,
    /// What the move does.
    pub effect: TransitionEffect,
}

/// Looks up the transition for an input in a state.
///
/// # Errors
///
/// Returns [`FlowError::InvalidEventForState`] when the input is not
/// expected in `state`.
pub fn transition(state: SessionState, input: FlowInput) -> Result<Transition, FlowError> {
    use SessionState::*;

    let (next, effect) = match (state, input) {
        (_, FlowInput::Start) => (AwaitingName, TransitionEffect::PromptName { greet: true }),
        (_, FlowInput::Sell) => (AwaitingName, TransitionEffect::PromptName { greet: false }),
        (AwaitingName | AwaitingPrice | AwaitingPhoto, FlowInput::Cancel) => {
            (Idle, TransitionEffect::Abandon)
        }
        (AwaitingName, FlowInput::Text) => (AwaitingPrice, TransitionEffect::StoreName),
        (AwaitingPrice, FlowInput::Text) => (AwaitingPhoto, TransitionEffect::StorePrice),
        (AwaitingPhoto, FlowInput::Photo) => (Idle, TransitionEffect::Complete),
        _ => {
            return Err(FlowError::InvalidEventForState {
                state,
                input: input.as_str(),
            });
        }
    };

    Ok(Transition { next, effect })
}

/// The result of handling one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowOutcome {
    /// Replies to send, in order.
    pub replies: Vec<OutboundAction>,
    /// The finished submission, if this event completed the dialog.
    pub finished: Option<FinishedSubmission>,
}

impl FlowOutcome {
    /// Returns true if the event produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty() && self.finished.is_none()
    }
}

/// Drives each user's submission dialog.
#[derive(Debug, Clone)]
pub struct FlowController {
    store: Arc<SessionStore>,
}

impl FlowController {
    /// Creates a controller over a session store.
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying session store.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Applies one event to its sender's session.
    ///
    /// The sender's session is locked for the duration of this call only;
    /// the returned finished submission is published after the lock is
    /// released. Mistyped input yields an empty outcome.
    #[instrument(skip(self, event), fields(user_id = %event.user_id(), kind = event.kind()))]
    pub async fn handle(&self, event: &InboundEvent) -> FlowOutcome {
        let (Some(input), Some((chat_id, message_id))) = (FlowInput::of(event), event.origin())
        else {
            return FlowOutcome::default();
        };

        let mut session = self.store.lock(event.user_id()).await;

        let step = match transition(session.state, input) {
            Ok(step) => step,
            Err(e) => {
                debug!(error = %e, "ignoring event");
                return FlowOutcome::default();
            }
        };

        let mut outcome = FlowOutcome::default();
        match (step.effect, event) {
            (TransitionEffect::PromptName { greet }, _) => {
                if session.state.is_active() {
                    debug!(from = %session.state, "restarting submission");
                }
                session.begin();
                if greet {
                    outcome.replies.push(OutboundAction::reply(
                        chat_id,
                        message_id,
                        MessageKey::StartMessage,
                    ));
                }
                outcome
                    .replies
                    .push(OutboundAction::reply(chat_id, message_id, MessageKey::EnterName));
            }
            (TransitionEffect::StoreName, InboundEvent::Text { text, .. }) => {
                session.record_name(text.clone());
                outcome
                    .replies
                    .push(OutboundAction::reply(chat_id, message_id, MessageKey::EnterPrice));
            }
            (TransitionEffect::StorePrice, InboundEvent::Text { text, .. }) => {
                session.record_price(text.clone());
                outcome
                    .replies
                    .push(OutboundAction::reply(chat_id, message_id, MessageKey::SendPhoto));
            }
            (TransitionEffect::Complete, InboundEvent::Photo { sender, variants, .. }) => {
                let Some(photo) = PhotoVariant::select_largest(variants) else {
                    debug!("ignoring photo without variants");
                    return FlowOutcome::default();
                };
                let started_at = session.started_at;
                outcome.finished = session.complete(photo, sender.clone());
                if outcome.finished.is_some() {
                    let elapsed_secs = started_at.map(|t| (Utc::now() - t).num_seconds());
                    info!(?elapsed_secs, "submission completed");
                }
            }
            (TransitionEffect::Abandon, _) => {
                session.reset();
                outcome.replies.push(OutboundAction::reply(
                    chat_id,
                    message_id,
                    MessageKey::SellCancelled,
                ));
                info!("submission abandoned");
            }
            (effect, _) => {
                debug!(?effect, "transition effect does not match event payload");
                return FlowOutcome::default();
            }
        }

        debug_assert_eq!(session.state, step.next);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PhotoRef, Sender};
    use market_relay_core::{ChatId, MessageId, UserId};

    const USER: UserId = UserId::new(100);
    const CHAT: ChatId = ChatId::new(100);

    fn sender() -> Sender {
        Sender::new(USER, Some("alice".to_string()))
    }

    fn command(command: Command) -> InboundEvent {
        InboundEvent::Command {
            sender: sender(),
            chat_id: CHAT,
            message_id: MessageId::new(1),
            command,
        }
    }

    fn text(body: &str) -> InboundEvent {
        InboundEvent::Text {
            sender: sender(),
            chat_id: CHAT,
            message_id: MessageId::new(2),
            text: body.to_string(),
        }
    }

    fn photo(file_ids: &[&str]) -> InboundEvent {
        InboundEvent::Photo {
            sender: sender(),
            chat_id: CHAT,
            message_id: MessageId::new(3),
            variants: file_ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let side = 100 * (i as u32 + 1);
                    PhotoVariant {
                        file_id: (*id).to_string(),
                        width: side,
                        height: side,
                        file_size: None,
                    }
                })
                .collect(),
        }
    }

    fn keys(outcome: &FlowOutcome) -> Vec<MessageKey> {
        outcome.replies.iter().map(OutboundAction::key).collect()
    }

    fn controller() -> FlowController {
        FlowController::new(Arc::new(SessionStore::new()))
    }

    #[test]
    fn transition_table() {
        use SessionState::*;

        let cases = [
            (Idle, FlowInput::Sell, AwaitingName),
            (Idle, FlowInput::Start, AwaitingName),
            (AwaitingName, FlowInput::Text, AwaitingPrice),
            (AwaitingPrice, FlowInput::Text, AwaitingPhoto),
            (AwaitingPhoto, FlowInput::Photo, Idle),
            (AwaitingName, FlowInput::Sell, AwaitingName),
            (AwaitingPrice, FlowInput::Sell, AwaitingName),
            (AwaitingPhoto, FlowInput::Start, AwaitingName),
            (AwaitingName, FlowInput::Cancel, Idle),
            (AwaitingPhoto, FlowInput::Cancel, Idle),
        ];
        for (state, input, next) in cases {
            let step = transition(state, input).expect("transition should exist");
            assert_eq!(step.next, next, "{state} + {}", input.as_str());
        }
    }

    #[test]
    fn transition_rejects_mistyped_input() {
        use SessionState::*;

        let cases = [
            (Idle, FlowInput::Text),
            (Idle, FlowInput::Photo),
            (Idle, FlowInput::Cancel),
            (AwaitingName, FlowInput::Photo),
            (AwaitingPrice, FlowInput::Photo),
            (AwaitingPhoto, FlowInput::Text),
            (AwaitingName, FlowInput::OtherCommand),
        ];
        for (state, input) in cases {
            let err = transition(state, input).expect_err("should be rejected");
            assert_eq!(
                err,
                FlowError::InvalidEventForState {
                    state,
                    input: input.as_str()
                }
            );
        }
    }

    #[tokio::test]
    async fn full_dialog_produces_submission() {
        let flow = controller();

        let outcome = flow.handle(&command(Command::Sell)).await;
        assert_eq!(keys(&outcome), vec![MessageKey::EnterName]);

        let outcome = flow.handle(&text("Bike")).await;
        assert_eq!(keys(&outcome), vec![MessageKey::EnterPrice]);

        let outcome = flow.handle(&text("50")).await;
        assert_eq!(keys(&outcome), vec![MessageKey::SendPhoto]);

        let outcome = flow.handle(&photo(&["small", "large"])).await;
        assert!(outcome.replies.is_empty());
        let finished = outcome.finished.expect("should finish");
        assert_eq!(finished.name, "Bike");
        assert_eq!(finished.price, "50");
        assert_eq!(finished.photo, PhotoRef::new("large"));
        assert_eq!(finished.submitter_label(), "alice");

        let session = flow.store().get(USER).await;
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.collected.is_empty());
    }

    #[tokio::test]
    async fn start_greets_then_prompts() {
        let flow = controller();
        let outcome = flow.handle(&command(Command::Start)).await;
        assert_eq!(
            keys(&outcome),
            vec![MessageKey::StartMessage, MessageKey::EnterName]
        );
    }

    #[tokio::test]
    async fn prompts_reply_to_triggering_message() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;
        let outcome = flow.handle(&text("Bike")).await;

        assert_eq!(
            outcome.replies,
            vec![OutboundAction::reply(CHAT, MessageId::new(2), MessageKey::EnterPrice)]
        );
    }

    #[tokio::test]
    async fn photo_before_photo_step_is_ignored() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;

        let outcome = flow.handle(&photo(&["p"])).await;
        assert!(outcome.is_empty());
        assert_eq!(flow.store().get(USER).await.state, SessionState::AwaitingName);

        flow.handle(&text("Bike")).await;
        let outcome = flow.handle(&photo(&["p"])).await;
        assert!(outcome.is_empty());
        let session = flow.store().get(USER).await;
        assert_eq!(session.state, SessionState::AwaitingPrice);
        assert_eq!(session.collected.name.as_deref(), Some("Bike"));
    }

    #[tokio::test]
    async fn text_in_photo_step_and_idle_is_ignored() {
        let flow = controller();
        assert!(flow.handle(&text("hello")).await.is_empty());

        flow.handle(&command(Command::Sell)).await;
        flow.handle(&text("Bike")).await;
        flow.handle(&text("50")).await;
        assert!(flow.handle(&text("more text")).await.is_empty());
        assert_eq!(flow.store().get(USER).await.state, SessionState::AwaitingPhoto);
    }

    #[tokio::test]
    async fn empty_photo_is_ignored() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;
        flow.handle(&text("Bike")).await;
        flow.handle(&text("50")).await;

        assert!(flow.handle(&photo(&[])).await.is_empty());
        assert_eq!(flow.store().get(USER).await.state, SessionState::AwaitingPhoto);
    }

    #[tokio::test]
    async fn restart_discards_previous_data() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;
        flow.handle(&text("Old bike")).await;
        flow.handle(&text("999")).await;

        let outcome = flow.handle(&command(Command::Sell)).await;
        assert_eq!(keys(&outcome), vec![MessageKey::EnterName]);
        assert!(flow.store().get(USER).await.collected.is_empty());

        flow.handle(&text("Lamp")).await;
        flow.handle(&text("10")).await;
        let finished = flow
            .handle(&photo(&["p"]))
            .await
            .finished
            .expect("should finish");
        assert_eq!(finished.name, "Lamp");
        assert_eq!(finished.price, "10");
    }

    #[tokio::test]
    async fn cancel_abandons_dialog() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;
        flow.handle(&text("Bike")).await;

        let outcome = flow.handle(&command(Command::Cancel)).await;
        assert_eq!(keys(&outcome), vec![MessageKey::SellCancelled]);
        assert_eq!(flow.store().get(USER).await.state, SessionState::Idle);

        assert!(flow.handle(&photo(&["p"])).await.is_empty());
    }

    #[tokio::test]
    async fn cancel_when_idle_is_ignored() {
        let flow = controller();
        assert!(flow.handle(&command(Command::Cancel)).await.is_empty());
    }

    #[tokio::test]
    async fn callbacks_are_not_dialog_input() {
        let flow = controller();
        flow.handle(&command(Command::Sell)).await;

        let outcome = flow
            .handle(&InboundEvent::Callback {
                sender: sender(),
                callback_id: "cb".to_string(),
                payload: "cancel 1".to_string(),
            })
            .await;
        assert!(outcome.is_empty());
        assert_eq!(flow.store().get(USER).await.state, SessionState::AwaitingName);
    }

    #[tokio::test]
    async fn users_progress_independently() {
        let flow = controller();
        let other = Sender::new(UserId::new(200), None);

        flow.handle(&command(Command::Sell)).await;
        flow.handle(&InboundEvent::Command {
            sender: other.clone(),
            chat_id: ChatId::new(200),
            message_id: MessageId::new(1),
            command: Command::Sell,
        })
        .await;
        flow.handle(&text("Bike")).await;

        assert_eq!(flow.store().get(USER).await.state, SessionState::AwaitingPrice);
        assert_eq!(
            flow.store().get(UserId::new(200)).await.state,
            SessionState::AwaitingName
        );
    }
}
