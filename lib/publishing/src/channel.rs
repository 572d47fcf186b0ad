//! Channel trait and related types.
//!
//! The channel is the shared broadcast destination listings are posted to.
//! Implementations wrap a chat platform; the in-memory channel stands in
//! for one in tests.

use crate::caption::Caption;
use crate::error::ChannelError;
use async_trait::async_trait;
use market_relay_conversation::PhotoRef;
use market_relay_core::MessageId;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// The channel's identifier for a published listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicationReference {
    /// Channel-assigned id of the posted message.
    pub message_id: MessageId,
}

impl PublicationReference {
    /// Creates a reference to a channel message.
    #[must_use]
    pub fn new(message_id: MessageId) -> Self {
        Self { message_id }
    }
}

/// Trait for the destination channel.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Returns the channel's handle (for example `@market`).
    fn handle(&self) -> &str;

    /// Posts a photo with a caption as a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel does not accept the post.
    async fn publish_photo(
        &self,
        photo: &PhotoRef,
        caption: &Caption,
    ) -> Result<PublicationReference, ChannelError>;

    /// Deletes a posted message.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::MessageNotFound`] if there is no such
    /// message, or another error if the deletion fails.
    async fn delete_message(&self, message_id: MessageId) -> Result<(), ChannelError>;
}

/// A post held by [`InMemoryChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    /// The photo that was posted.
    pub photo: PhotoRef,
    /// The caption text.
    pub caption: String,
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i32,
    posts: BTreeMap<MessageId, StoredPost>,
    publish_calls: usize,
    delete_calls: usize,
}

/// A channel that keeps posts in memory.
///
/// Can be told to fail every publish, which is how transport failures are
/// simulated.
#[derive(Debug)]
pub struct InMemoryChannel {
    handle: String,
    fail_publish_with: Option<ChannelError>,
    state: Mutex<InMemoryState>,
}

impl InMemoryChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            fail_publish_with: None,
            state: Mutex::new(InMemoryState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Creates a channel on which every publish fails with `error`.
    #[must_use]
    pub fn failing(handle: impl Into<String>, error: ChannelError) -> Self {
        Self {
            fail_publish_with: Some(error),
            ..Self::new(handle)
        }
    }

    /// Returns the post with the given id, if present.
    pub async fn post(&self, message_id: MessageId) -> Option<StoredPost> {
        self.state.lock().await.posts.get(&message_id).cloned()
    }

    /// Returns the number of posts currently in the channel.
    pub async fn post_count(&self) -> usize {
        self.state.lock().await.posts.len()
    }

    /// Returns how many publish calls were made, including failed ones.
    pub async fn publish_calls(&self) -> usize {
        self.state.lock().await.publish_calls
    }

    /// Returns how many delete calls were made, including failed ones.
    pub async fn delete_calls(&self) -> usize {
        self.state.lock().await.delete_calls
    }
}

#[async_trait]
impl Channel for InMemoryChannel {
    fn handle(&self) -> &str {
        &self.handle
    }

    async fn publish_photo(
        &self,
        photo: &PhotoRef,
        caption: &Caption,
    ) -> Result<PublicationReference, ChannelError> {
        let mut state = self.state.lock().await;
        state.publish_calls += 1;
        if let Some(error) = &self.fail_publish_with {
            return Err(error.clone());
        }

        let message_id = MessageId::new(state.next_id);
        state.next_id += 1;
        state.posts.insert(
            message_id,
            StoredPost {
                photo: photo.clone(),
                caption: caption.as_str().to_string(),
            },
        );
        Ok(PublicationReference::new(message_id))
    }

    async fn delete_message(&self, message_id: MessageId) -> Result<(), ChannelError> {
        let mut state = self.state.lock().await;
        state.delete_calls += 1;
        state
            .posts
            .remove(&message_id)
            .map(|_| ())
            .ok_or(ChannelError::MessageNotFound { message_id })
    }
}
