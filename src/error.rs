// ABOUTME: Defines the error types for the relay library using thiserror.
// ABOUTME: Covers construction, dispatch, and action failures of commands.

use crate::command::RunId;

/// Errors produced while building or running commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Command built without an action")]
    MissingAction,

    #[error("Command requires a guard predicate but none was set")]
    MissingGuard,

    #[error("Command is already running (run {run_id})")]
    Busy { run_id: RunId },

    #[error("No tokio runtime available to spawn the command on")]
    NoRuntime,

    #[error("Action failed: {0}")]
    Action(#[from] anyhow::Error),

    #[error("Action panicked: {0}")]
    Panicked(String),

    #[error("Run dropped before the action settled")]
    Aborted,
}

impl CommandError {
    /// Returns true if this error came from the action itself
    /// rather than from dispatching it.
    pub fn is_action_fault(&self) -> bool {
        matches!(
            self,
            CommandError::Action(_) | CommandError::Panicked(_) | CommandError::Aborted
        )
    }
}
