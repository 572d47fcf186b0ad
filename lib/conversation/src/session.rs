//! Conversation session state.
//!
//! A session tracks where one user is in the submission dialog and what
//! they have entered so far. Fields are only ever filled in dialog order
//! and are cleared all at once when the dialog ends or restarts.

use crate::event::{PhotoRef, Sender};
use chrono::{DateTime, Utc};
use market_relay_core::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a submission dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No dialog in progress.
    #[default]
    Idle,
    /// Waiting for the item name.
    AwaitingName,
    /// Waiting for the item price.
    AwaitingPrice,
    /// Waiting for the item photo.
    AwaitingPhoto,
}

impl SessionState {
    /// Returns true if a dialog is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns the snake_case name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingName => "awaiting_name",
            Self::AwaitingPrice => "awaiting_price",
            Self::AwaitingPhoto => "awaiting_photo",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The partial submission gathered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedListing {
    /// Item name, set once the name step is done.
    pub name: Option<String>,
    /// Item price as typed by the user.
    pub price: Option<String>,
    /// Selected photo, set only at completion.
    pub photo: Option<PhotoRef>,
}

impl CollectedListing {
    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.photo.is_none()
    }

    /// Builds the finished submission once every field is present.
    #[must_use]
    pub fn into_finished(self, submitter: Sender) -> Option<FinishedSubmission> {
        Some(FinishedSubmission {
            name: self.name?,
            price: self.price?,
            photo: self.photo?,
            submitter,
        })
    }
}

/// A completed submission, ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedSubmission {
    /// Item name.
    pub name: String,
    /// Item price as typed by the user.
    pub price: String,
    /// Photo to publish.
    pub photo: PhotoRef,
    /// Who submitted it.
    pub submitter: Sender,
}

impl FinishedSubmission {
    /// The label shown as the seller in the published caption.
    #[must_use]
    pub fn submitter_label(&self) -> String {
        self.submitter.display_label()
    }
}

/// One user's submission dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Current dialog state.
    pub state: SessionState,
    /// Data collected so far.
    pub collected: CollectedListing,
    /// When the current dialog began, if one is in progress.
    pub started_at: Option<DateTime<Utc>>,
}

impl ConversationSession {
    /// Creates an idle session for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: SessionState::Idle,
            collected: CollectedListing::default(),
            started_at: None,
        }
    }

    /// Starts (or restarts) the dialog, discarding anything collected.
    pub fn begin(&mut self) {
        self.collected = CollectedListing::default();
        self.state = SessionState::AwaitingName;
        self.started_at = Some(Utc::now());
    }

    /// Records the item name and moves on to the price.
    pub fn record_name(&mut self, name: impl Into<String>) {
        debug_assert_eq!(self.state, SessionState::AwaitingName);
        self.collected.name = Some(name.into());
        self.state = SessionState::AwaitingPrice;
    }

    /// Records the item price and moves on to the photo.
    pub fn record_price(&mut self, price: impl Into<String>) {
        debug_assert_eq!(self.state, SessionState::AwaitingPrice);
        self.collected.price = Some(price.into());
        self.state = SessionState::AwaitingPhoto;
    }

    /// Records the photo and takes the finished submission, resetting the
    /// session to idle.
    ///
    /// Returns `None`, leaving the session untouched, unless the session is
    /// waiting for a photo with a name and price already collected.
    pub fn complete(&mut self, photo: PhotoRef, submitter: Sender) -> Option<FinishedSubmission> {
        if self.state != SessionState::AwaitingPhoto {
            return None;
        }
        if self.collected.name.is_none() || self.collected.price.is_none() {
            return None;
        }

        self.collected.photo = Some(photo);
        let finished = std::mem::take(&mut self.collected).into_finished(submitter);
        self.reset();
        finished
    }

    /// Ends the dialog and clears everything collected.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.collected = CollectedListing::default();
        self.started_at = None;
    }
}
