// ABOUTME: RelayAsyncCommand - an async command without busy tracking.
// ABOUTME: execute spawns the action fire-and-forget; overlapping runs are allowed.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::executor::spawn_action;
use super::run_handle::FinishOnDrop;
use super::traits::{boxed_action, boxed_guard};
use super::{
    Action, AsyncCommand, Command, CommandBuilder, CommandConfig, Guard, RunHandle, RunId,
};
use crate::error::CommandError;
use crate::notify::ChangeSignal;

struct Inner<P> {
    config: CommandConfig,
    action: Action<P>,
    guard: Option<Guard<P>>,
    signal: ChangeSignal,
}

/// Asynchronous command gated only by its guard predicate.
///
/// Use [`SingleFlightCommand`](super::SingleFlightCommand) when overlapping
/// runs must be prevented.
pub struct RelayAsyncCommand<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for RelayAsyncCommand<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Send + 'static> RelayAsyncCommand<P> {
    /// Create a command without a guard predicate.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        Self::from_parts(CommandConfig::default(), boxed_action(action), None)
    }

    /// Create a command gated by `guard`.
    pub fn with_guard<F, Fut, G>(action: F, guard: G) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
        G: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Self::from_parts(
            CommandConfig::default(),
            boxed_action(action),
            Some(boxed_guard(guard)),
        )
    }

    /// Start building a command with custom configuration.
    pub fn builder() -> CommandBuilder<P> {
        CommandBuilder::new()
    }

    pub(crate) fn from_parts(
        config: CommandConfig,
        action: Action<P>,
        guard: Option<Guard<P>>,
    ) -> Self {
        let signal = config.change_signal();
        Self {
            inner: Arc::new(Inner {
                config,
                action,
                guard,
                signal,
            }),
        }
    }

    /// Label used in log events.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// The guard's verdict, or true without a guard.
    pub fn can_execute(&self, parameter: &P) -> bool {
        match &self.inner.guard {
            Some(guard) => guard(parameter),
            None => true,
        }
    }

    /// Spawn the action and return a handle to the run.
    pub fn trigger_execution(&self, parameter: P) -> Result<RunHandle, CommandError> {
        let runtime = self.inner.config.spawn_handle()?;
        let run_id = RunId::new();
        let handle = RunHandle::new(run_id);
        let run = handle.clone();
        let inner = Arc::clone(&self.inner);

        tracing::debug!(command = %self.inner.config.name, %run_id, "run started");
        spawn_action(
            &runtime,
            Arc::clone(&self.inner.action),
            parameter,
            move |result| {
                let finish = FinishOnDrop::new(run, result);
                if let Some(error) = finish.error() {
                    inner.config.fault_policy.report(&inner.config.name, run_id, error);
                }
            },
        );

        Ok(handle)
    }
}

impl<P: Send + 'static> Command<P> for RelayAsyncCommand<P> {
    fn can_execute(&self, parameter: &P) -> bool {
        RelayAsyncCommand::can_execute(self, parameter)
    }

    fn execute(&self, parameter: P) {
        if let Err(error) = self.trigger_execution(parameter) {
            tracing::warn!(command = %self.inner.config.name, %error, "command dispatch failed");
        }
    }

    fn signal(&self) -> &ChangeSignal {
        &self.inner.signal
    }
}

#[async_trait]
impl<P: Send + 'static> AsyncCommand<P> for RelayAsyncCommand<P> {
    async fn execute_async(&self, parameter: P) -> Result<(), CommandError> {
        let future = (self.inner.action)(parameter);
        future.await.map_err(CommandError::Action)
    }
}
