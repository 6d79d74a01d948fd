//! Command usage reporting.

use std::time::SystemTime;

use serde::Serialize;

use crate::feature::FeatureTag;

/// One successful command invocation, reported for statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    /// Feature tag of the invoked handler, if it has one.
    pub feature: Option<FeatureTag>,
    /// Channel the command was used in.
    pub channel_id: String,
    /// User who used the command.
    pub user_id: String,
    /// When the handler was about to run.
    pub at: SystemTime,
}

impl UsageRecord {
    /// Creates a record stamped with the current time.
    pub fn now(
        feature: Option<FeatureTag>,
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            feature,
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            at: SystemTime::now(),
        }
    }
}

/// Receives usage records from the dispatcher.
///
/// Implementations must return immediately: `record` is called on the
/// response path and has no way to report failure.
pub trait UsageRecorder: Send + Sync {
    /// Hands off one record.
    fn record(&self, record: UsageRecord);
}

/// A [`UsageRecorder`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUsageRecorder;

impl UsageRecorder for NoopUsageRecorder {
    fn record(&self, _record: UsageRecord) {}
}
