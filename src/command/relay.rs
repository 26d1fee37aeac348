// ABOUTME: RelayCommand - a synchronous command backed by a closure.
// ABOUTME: Optional guard predicate; execute runs the action on the caller's thread.

use std::sync::Arc;

use super::traits::boxed_guard;
use super::{Command, CommandBuilder, CommandConfig, Guard, SyncAction};
use crate::notify::ChangeSignal;

/// Synchronous command.
pub struct RelayCommand<P> {
    config: CommandConfig,
    action: SyncAction<P>,
    guard: Option<Guard<P>>,
    signal: ChangeSignal,
}

impl<P: Send + 'static> RelayCommand<P> {
    /// Create a command without a guard predicate.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(P) + Send + Sync + 'static,
    {
        Self::from_parts(CommandConfig::default(), Arc::new(action), None)
    }

    /// Create a command gated by `guard`.
    pub fn with_guard<F, G>(action: F, guard: G) -> Self
    where
        F: Fn(P) + Send + Sync + 'static,
        G: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Self::from_parts(
            CommandConfig::default(),
            Arc::new(action),
            Some(boxed_guard(guard)),
        )
    }

    /// Start building a command with custom configuration.
    pub fn builder() -> CommandBuilder<P> {
        CommandBuilder::new()
    }

    pub(crate) fn from_parts(
        config: CommandConfig,
        action: SyncAction<P>,
        guard: Option<Guard<P>>,
    ) -> Self {
        let signal = config.change_signal();
        Self {
            config,
            action,
            guard,
            signal,
        }
    }

    /// Label used in log events.
    pub fn name(&self) -> &str {
        &self.config.name
    }
}

impl<P: Send + 'static> Command<P> for RelayCommand<P> {
    fn can_execute(&self, parameter: &P) -> bool {
        match &self.guard {
            Some(guard) => guard(parameter),
            None => true,
        }
    }

    fn execute(&self, parameter: P) {
        tracing::trace!(command = %self.config.name, "executing");
        (self.action)(parameter);
    }

    fn signal(&self) -> &ChangeSignal {
        &self.signal
    }
}
