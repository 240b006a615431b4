//! Debounced background saving.
//!
//! Every [`AutoSaver::schedule`] replaces the pending snapshot and restarts
//! the quiet timer; the store is written only once no new snapshot arrived
//! for the whole quiet interval. A failed write keeps the snapshot pending
//! and is retried after another quiet interval. Dropping the saver cancels a
//! pending write.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use flowdesk_flow::SerializedGraph;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::store::SnapshotStore;

/// Quiet interval used when none is configured.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

enum Command {
    Schedule(Box<SerializedGraph>),
    Discard,
    Flush(oneshot::Sender<Result<bool, StorageError>>),
}

/// Counters of the autosave task.
#[derive(Debug, Default)]
struct Counters {
    saves: AtomicU64,
    failures: AtomicU64,
}

/// Snapshot of the autosave counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoSaveStats {
    /// Successful writes.
    pub saves: u64,
    /// Failed writes.
    pub failures: u64,
}

/// Handle to a running autosave task.
pub struct AutoSaver {
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    counters: Arc<Counters>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("stats", &self.stats())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl AutoSaver {
    /// Start the task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn SnapshotStore>, key: impl Into<String>, quiet: Duration) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let counters = Arc::new(Counters::default());
        let worker = Worker {
            store,
            key: key.into(),
            quiet,
            counters: Arc::clone(&counters),
        };
        let task = tokio::spawn(worker.run(rx, cancel.clone()));
        Self {
            commands,
            cancel,
            counters,
            task: Some(task),
        }
    }

    /// Replace the pending snapshot and restart the quiet timer.
    pub fn schedule(&self, snapshot: SerializedGraph) -> Result<(), StorageError> {
        if self.cancel.is_cancelled() {
            return Err(StorageError::Closed);
        }
        self.commands
            .send(Command::Schedule(Box::new(snapshot)))
            .map_err(|_| StorageError::Closed)
    }

    /// Drop the pending snapshot without writing it, for when the store
    /// already holds what the caller has.
    pub fn discard(&self) -> Result<(), StorageError> {
        self.commands.send(Command::Discard).map_err(|_| StorageError::Closed)
    }

    /// Write the pending snapshot now. `Ok(false)` when nothing was pending.
    pub async fn flush(&self) -> Result<bool, StorageError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Flush(reply))
            .map_err(|_| StorageError::Closed)?;
        response.await.map_err(|_| StorageError::Closed)?
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> AutoSaveStats {
        AutoSaveStats {
            saves: self.counters.saves.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Stop the task, discarding any pending snapshot, and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "autosave task ended abnormally");
        }
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker {
    store: Arc<dyn SnapshotStore>,
    key: String,
    quiet: Duration,
    counters: Arc<Counters>,
}

impl Worker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>, cancel: CancellationToken) {
        let mut pending: Option<Box<SerializedGraph>> = None;
        let timer = tokio::time::sleep(self.quiet);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    if pending.is_some() {
                        tracing::debug!(key = %self.key, "pending autosave discarded");
                    }
                    break;
                }
                command = rx.recv() => match command {
                    Some(Command::Schedule(snapshot)) => {
                        pending = Some(snapshot);
                        timer.as_mut().reset(Instant::now() + self.quiet);
                    }
                    Some(Command::Discard) => {
                        if pending.take().is_some() {
                            tracing::debug!(key = %self.key, "pending autosave dropped");
                        }
                    }
                    Some(Command::Flush(reply)) => {
                        let result = match pending.take() {
                            Some(snapshot) => match self.write(&snapshot).await {
                                Ok(()) => Ok(true),
                                Err(e) => {
                                    pending = Some(snapshot);
                                    timer.as_mut().reset(Instant::now() + self.quiet);
                                    Err(e)
                                }
                            },
                            None => Ok(false),
                        };
                        let _ = reply.send(result);
                    }
                    None => break,
                },
                () = &mut timer, if pending.is_some() => {
                    if let Some(snapshot) = pending.take()
                        && self.write(&snapshot).await.is_err()
                    {
                        pending = Some(snapshot);
                        timer.as_mut().reset(Instant::now() + self.quiet);
                    }
                }
            }
        }
        tracing::debug!(key = %self.key, "autosave task stopped");
    }

    async fn write(&self, snapshot: &SerializedGraph) -> Result<(), StorageError> {
        match self.store.save(&self.key, snapshot).await {
            Ok(()) => {
                self.counters.saves.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %self.key, nodes = snapshot.nodes.len(), "autosaved");
                Ok(())
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %self.key, error = %e, "autosave failed");
                Err(e)
            }
        }
    }
}
