// ABOUTME: FaultPolicy - where action failures of fire-and-forget runs are reported.
// ABOUTME: Ignore, log through tracing, or hand to a caller-supplied handler.

use std::sync::Arc;

use super::RunId;
use crate::error::CommandError;

/// Callback receiving action faults.
pub type FaultHandler = Arc<dyn Fn(&CommandError) + Send + Sync>;

/// What to do with an action failure nobody is awaiting.
///
/// The failure is always stored on the run's [`RunHandle`](super::RunHandle);
/// the policy decides whether it is reported anywhere else.
#[derive(Clone, Default)]
pub enum FaultPolicy {
    /// Drop the fault after the run handle records it.
    Ignore,
    /// Emit a `tracing` warning.
    #[default]
    Log,
    /// Pass the fault to a handler.
    Handler(FaultHandler),
}

impl FaultPolicy {
    /// Build a [`FaultPolicy::Handler`] from a closure.
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&CommandError) + Send + Sync + 'static,
    {
        FaultPolicy::Handler(Arc::new(handler))
    }

    pub(crate) fn report(&self, command: &str, run_id: RunId, error: &CommandError) {
        match self {
            FaultPolicy::Ignore => {}
            FaultPolicy::Log => {
                tracing::warn!(command, %run_id, error = %error, "command action failed");
            }
            FaultPolicy::Handler(handler) => handler(error),
        }
    }
}

impl std::fmt::Debug for FaultPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultPolicy::Ignore => write!(f, "Ignore"),
            FaultPolicy::Log => write!(f, "Log"),
            FaultPolicy::Handler(_) => write!(f, "Handler(..)"),
        }
    }
}
