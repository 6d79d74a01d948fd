//! Channel kinds a message can arrive from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of channel an inbound message was posted in.
///
/// Command scopes are expressed in terms of these kinds, and the key of each
/// kind is what users see in out-of-scope replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// The platform did not tell us what kind of channel this is.
    Unknown,
    /// One-on-one conversation with the bot.
    PrivateText,
    /// Group conversation that requires an invitation to join.
    GroupPrivateText,
    /// Group conversation anyone can join.
    GroupPublicText,
}

impl ChannelKind {
    /// Every kind a command can be scoped to, in display order.
    pub const SCOPABLE: [ChannelKind; 3] = [
        ChannelKind::PrivateText,
        ChannelKind::GroupPrivateText,
        ChannelKind::GroupPublicText,
    ];

    /// Returns the stable key of this kind.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::PrivateText => "private_text",
            Self::GroupPrivateText => "group_private_text",
            Self::GroupPublicText => "group_public_text",
        }
    }

    /// Returns `true` for both group kinds.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::GroupPrivateText | Self::GroupPublicText)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
