//! Asynchronous usage recording.
//!
//! The dispatcher reports usage synchronously on the response path, so the
//! recorder here only enqueues. A background worker drains the queue into a
//! [`UsageSink`] at its own pace.
//!
//! ```text
//! Dispatcher ──record()──► [bounded queue] ──worker──► UsageSink::store()
//! ```
//!
//! A full or closed queue drops the record. Usage statistics are best effort
//! and never slow down or fail a command.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jelly_core::{UsageRecord, UsageRecorder};

/// A sink failed to store a record.
#[derive(Debug, Clone, Error)]
#[error("failed to store usage record: {message}")]
pub struct UsageSinkError {
    message: String,
}

impl UsageSinkError {
    /// Creates a sink error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Final destination of usage records, e.g. a statistics table.
#[async_trait]
pub trait UsageSink: Send + Sync + 'static {
    /// Stores one record.
    async fn store(&self, record: UsageRecord) -> Result<(), UsageSinkError>;
}

#[async_trait]
impl<S: UsageSink + ?Sized> UsageSink for Arc<S> {
    async fn store(&self, record: UsageRecord) -> Result<(), UsageSinkError> {
        (**self).store(record).await
    }
}

/// Logs every record at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn store(&self, record: UsageRecord) -> Result<(), UsageSinkError> {
        info!(
            feature = record.feature.map(|f| f.key()),
            channel_id = %record.channel_id,
            user_id = %record.user_id,
            "Command used"
        );
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageSink {
    records: Arc<Mutex<Vec<UsageRecord>>>,
}

impl MemoryUsageSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything stored so far.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().clone()
    }

    /// Number of records stored so far.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl UsageSink for MemoryUsageSink {
    async fn store(&self, record: UsageRecord) -> Result<(), UsageSinkError> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// A [`UsageRecorder`] backed by a bounded queue and a worker task.
#[derive(Debug, Clone)]
pub struct QueuedUsageRecorder {
    sender: mpsc::Sender<UsageRecord>,
}

impl QueuedUsageRecorder {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// The worker stops when `cancel` fires or every recorder clone is
    /// dropped, storing whatever is still queued first.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<S: UsageSink>(
        sink: S,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_worker(sink, receiver, cancel));
        (Self { sender }, handle)
    }
}

impl UsageRecorder for QueuedUsageRecorder {
    fn record(&self, record: UsageRecord) {
        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                debug!(feature = ?record.feature, "Usage queue full, dropping record");
            }
            Err(TrySendError::Closed(record)) => {
                debug!(feature = ?record.feature, "Usage worker stopped, dropping record");
            }
        }
    }
}

async fn run_worker<S: UsageSink>(
    sink: S,
    mut receiver: mpsc::Receiver<UsageRecord>,
    cancel: CancellationToken,
) {
    debug!("Usage worker started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = receiver.recv() => match next {
                Some(record) => store(&sink, record).await,
                None => break,
            },
        }
    }

    receiver.close();
    while let Ok(record) = receiver.try_recv() {
        store(&sink, record).await;
    }

    debug!("Usage worker stopped");
}

async fn store<S: UsageSink>(sink: &S, record: UsageRecord) {
    if let Err(e) = sink.store(record).await {
        warn!(error = %e, "Usage sink rejected a record");
    }
}
