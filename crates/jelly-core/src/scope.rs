//! Access scopes for command handlers.
//!
//! A [`CommandScope`] lists the channel kinds a handler may run in. The
//! dispatcher consults a [`ScopeChecker`] before invoking a handler; the
//! default checker, [`ScopeMembership`], simply tests membership.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelKind;

/// The set of channel kinds a handler is permitted to run in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandScope {
    /// Usable everywhere.
    #[default]
    Unrestricted,
    /// Usable only in the listed kinds, kept in the order they were given.
    Only(Vec<ChannelKind>),
}

impl CommandScope {
    /// Creates a scope restricted to `kinds`.
    ///
    /// Duplicates are dropped while keeping first-seen order.
    pub fn only(kinds: impl IntoIterator<Item = ChannelKind>) -> Self {
        let mut list = Vec::new();
        for kind in kinds {
            if !list.contains(&kind) {
                list.push(kind);
            }
        }
        Self::Only(list)
    }

    /// Scope covering both group kinds.
    pub fn group_only() -> Self {
        Self::only([ChannelKind::GroupPrivateText, ChannelKind::GroupPublicText])
    }

    /// Scope covering one-on-one conversations.
    pub fn private_only() -> Self {
        Self::only([ChannelKind::PrivateText])
    }

    /// Returns `true` if `kind` is permitted by this scope.
    pub fn is_in_scope(&self, kind: ChannelKind) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Only(kinds) => kinds.contains(&kind),
        }
    }

    /// Returns the permitted kinds in order.
    ///
    /// An unrestricted scope reports every scopable kind.
    pub fn available_kinds(&self) -> Vec<ChannelKind> {
        match self {
            Self::Unrestricted => ChannelKind::SCOPABLE.to_vec(),
            Self::Only(kinds) => kinds.clone(),
        }
    }

    /// Returns `true` if this scope places no restriction.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

/// Decides whether a handler with a given scope may run in a channel kind.
pub trait ScopeChecker: Send + Sync {
    /// Returns `true` if `kind` is allowed by `scope`.
    fn is_allowed(&self, scope: &CommandScope, kind: ChannelKind) -> bool;
}

/// The default [`ScopeChecker`]: plain set membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeMembership;

impl ScopeChecker for ScopeMembership {
    fn is_allowed(&self, scope: &CommandScope, kind: ChannelKind) -> bool {
        scope.is_in_scope(kind)
    }
}
