// ABOUTME: Spawns an action as a detached tokio task with guaranteed settlement.
// ABOUTME: Success, error, panic and task drop all reach the settle callback once.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::runtime::Handle;

use super::Action;
use crate::error::CommandError;

/// Calls its callback exactly once when dropped.
///
/// If the task is dropped before an outcome is recorded, the run counts as
/// aborted.
struct Settle<F>
where
    F: FnOnce(Result<(), CommandError>),
{
    callback: Option<F>,
    outcome: Option<Result<(), CommandError>>,
}

impl<F> Drop for Settle<F>
where
    F: FnOnce(Result<(), CommandError>),
{
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            let outcome = self.outcome.take().unwrap_or(Err(CommandError::Aborted));
            callback(outcome);
        }
    }
}

/// Run `action(parameter)` on `runtime` without waiting for it.
///
/// The action is invoked inside the spawned task, so nothing it does runs
/// before this function returns.
pub(crate) fn spawn_action<P, F>(runtime: &Handle, action: Action<P>, parameter: P, on_settled: F)
where
    P: Send + 'static,
    F: FnOnce(Result<(), CommandError>) + Send + 'static,
{
    runtime.spawn(async move {
        let mut settle = Settle {
            callback: Some(on_settled),
            outcome: None,
        };

        let outcome = AssertUnwindSafe(async move { action(parameter).await })
            .catch_unwind()
            .await;

        settle.outcome = Some(match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(CommandError::Action(error)),
            Err(panic) => Err(CommandError::Panicked(panic_message(panic.as_ref()))),
        });
    });
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
