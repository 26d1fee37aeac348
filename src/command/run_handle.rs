// ABOUTME: Implements RunHandle - the caller-side view of one spawned command run.
// ABOUTME: Provides status polling, waiting, timeout, duration, and the run's error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::error::CommandError;

/// Unique identifier of one run of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub(crate) fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Busy marker of a single-flight command: present while its run is in flight.
#[derive(Debug, Clone)]
pub struct RunMarker {
    /// The run this marker belongs to.
    pub run_id: RunId,
    /// When the run was started.
    pub started_at: Instant,
}

impl RunMarker {
    pub(crate) fn new() -> Self {
        Self {
            run_id: RunId::new(),
            started_at: Instant::now(),
        }
    }
}

/// Represents the current state of a spawned run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunStatus {
    /// The action has not settled yet.
    Running = 0,
    /// The action finished successfully.
    Completed = 1,
    /// The action returned an error, panicked, or was dropped.
    Failed = 2,
}

impl RunStatus {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => RunStatus::Running,
            1 => RunStatus::Completed,
            _ => RunStatus::Failed,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

struct RunState {
    id: RunId,
    /// Atomic status for lock-free reads.
    status: AtomicU8,
    error: Mutex<Option<Arc<CommandError>>>,
    done: Notify,
    start_time: Instant,
    end_time: Mutex<Option<Instant>>,
}

/// Handle to a run started with `trigger_execution`.
///
/// Dropping the handle does not affect the run. Clones observe the same run.
///
/// A RunHandle allows callers to:
/// - Check whether the action has settled (polling)
/// - Wait for completion, optionally with a timeout
/// - Read the action's error, if it failed
#[derive(Clone)]
pub struct RunHandle {
    state: Arc<RunState>,
}

impl RunHandle {
    pub(crate) fn new(id: RunId) -> Self {
        Self {
            state: Arc::new(RunState {
                id,
                status: AtomicU8::new(RunStatus::Running as u8),
                error: Mutex::new(None),
                done: Notify::new(),
                start_time: Instant::now(),
                end_time: Mutex::new(None),
            }),
        }
    }

    /// Identifier of this run.
    pub fn id(&self) -> RunId {
        self.state.id
    }

    /// Get the current execution status.
    pub fn status(&self) -> RunStatus {
        RunStatus::from_u8(self.state.status.load(Ordering::SeqCst))
    }

    /// Returns true once the action has settled.
    pub fn is_complete(&self) -> bool {
        self.status() != RunStatus::Running
    }

    /// The error the run failed with, if any.
    pub fn error(&self) -> Option<Arc<CommandError>> {
        self.state.error.lock().clone()
    }

    /// The run's error rendered as a string, if any.
    pub fn err(&self) -> Option<String> {
        self.state.error.lock().as_ref().map(|e| e.to_string())
    }

    /// Wait for the run to settle.
    ///
    /// Returns Ok(()) if the action succeeded, or the error message if it failed.
    pub async fn wait(&self) -> Result<(), String> {
        let notified = self.state.done.notified();
        tokio::pin!(notified);
        // Register interest before checking so a completion in between is not lost.
        notified.as_mut().enable();

        if self.is_complete() {
            return self.result();
        }

        notified.await;
        self.result()
    }

    /// Wait for the run to settle, giving up after `timeout`.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> Result<(), String> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(result) => result,
            Err(_) => Err("timeout waiting for completion".to_string()),
        }
    }

    /// Poll the current status and error without blocking.
    pub fn poll(&self) -> (RunStatus, Option<String>) {
        (self.status(), self.err())
    }

    /// How long the run has been going (or went for, once settled).
    pub fn duration(&self) -> Duration {
        match *self.state.end_time.lock() {
            Some(end) => end.duration_since(self.state.start_time),
            None => self.state.start_time.elapsed(),
        }
    }

    /// Record the outcome and wake all waiters. Only the first call counts.
    pub(crate) fn finish(&self, result: Result<(), CommandError>) {
        if self.is_complete() {
            return;
        }

        *self.state.end_time.lock() = Some(Instant::now());
        let status = match result {
            Ok(()) => RunStatus::Completed,
            Err(error) => {
                *self.state.error.lock() = Some(Arc::new(error));
                RunStatus::Failed
            }
        };
        self.state.status.store(status as u8, Ordering::SeqCst);
        self.state.done.notify_waiters();
    }

    fn result(&self) -> Result<(), String> {
        match self.status() {
            RunStatus::Completed => Ok(()),
            RunStatus::Failed => Err(self.err().unwrap_or_else(|| "unknown error".to_string())),
            RunStatus::Running => Err("not complete".to_string()),
        }
    }
}

/// Finishes a run handle with the stored outcome when dropped.
///
/// Cleanup that panics (an observer, a fault handler) still completes the
/// handle while unwinding, so waiters are never stranded.
pub(crate) struct FinishOnDrop {
    handle: RunHandle,
    outcome: Option<Result<(), CommandError>>,
}

impl FinishOnDrop {
    pub(crate) fn new(handle: RunHandle, outcome: Result<(), CommandError>) -> Self {
        Self {
            handle,
            outcome: Some(outcome),
        }
    }

    /// The error the run failed with, if any.
    pub(crate) fn error(&self) -> Option<&CommandError> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().err())
    }
}

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        if let Some(outcome) = self.outcome.take() {
            self.handle.finish(outcome);
        }
    }
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("id", &self.state.id)
            .field("status", &self.status())
            .finish()
    }
}
