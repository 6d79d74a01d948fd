//! Feature tags attached to handlers.

use std::fmt;

use serde::Serialize;

/// Identifies a bot feature for usage statistics and help text.
///
/// Feature tags are declared as constants next to the commands that use them:
///
/// ```rust
/// use jelly_core::FeatureTag;
///
/// pub const ECHO: FeatureTag = FeatureTag::new("txt_echo", "Repeat the given text.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureTag {
    key: &'static str,
    description: &'static str,
}

impl FeatureTag {
    /// Declares a feature tag.
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self { key, description }
    }

    /// The key usage statistics are grouped by.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The description shown for every handler tagged with this feature.
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}
