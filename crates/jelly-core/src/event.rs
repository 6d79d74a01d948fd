use serde::{Deserialize, Serialize};

use crate::channel::ChannelKind;

/// An inbound text message, as handed to the dispatcher by a platform adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEvent {
    /// The raw message text, prefix included.
    pub content: String,
    /// Kind of channel the message was posted in.
    pub channel_kind: ChannelKind,
    /// Identity of the channel.
    pub channel_id: String,
    /// Identity of the sender.
    pub user_id: String,
}

impl TextEvent {
    /// Creates a text event.
    pub fn new(
        content: impl Into<String>,
        channel_kind: ChannelKind,
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            channel_kind,
            channel_id: channel_id.into(),
            user_id: user_id.into(),
        }
    }
}
