// ABOUTME: CommandBuilder - fluent construction of every command variant.
// ABOUTME: Validates that an action (and, when required, a guard) was supplied.

use std::future::Future;

use tokio::runtime::Handle;

use super::traits::{boxed_action, boxed_guard};
use super::{
    Action, CommandConfig, FaultPolicy, Guard, RelayAsyncCommand, RelayCommand,
    SingleFlightCommand, SyncAction,
};
use crate::error::CommandError;
use crate::notify::RequeryHub;

/// Builder for commands.
///
/// ```ignore
/// let save = CommandBuilder::<Document>::new()
///     .name("save")
///     .action(|doc| async move { store(doc).await })
///     .guard(|doc| doc.is_dirty())
///     .build_single_flight()?;
/// ```
pub struct CommandBuilder<P> {
    config: CommandConfig,
    action: Option<Action<P>>,
    sync_action: Option<SyncAction<P>>,
    guard: Option<Guard<P>>,
    require_guard: bool,
}

impl<P: Send + 'static> Default for CommandBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + 'static> CommandBuilder<P> {
    /// Create a builder with default configuration and no action.
    pub fn new() -> Self {
        Self {
            config: CommandConfig::default(),
            action: None,
            sync_action: None,
            guard: None,
            require_guard: false,
        }
    }

    /// Label used in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the asynchronous action.
    pub fn action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.action = Some(boxed_action(action));
        self
    }

    /// Set the synchronous action used by [`build_relay`](Self::build_relay).
    pub fn sync_action<F>(mut self, action: F) -> Self
    where
        F: Fn(P) + Send + Sync + 'static,
    {
        self.sync_action = Some(std::sync::Arc::new(action));
        self
    }

    /// Set the guard predicate.
    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(boxed_guard(guard));
        self
    }

    /// Fail the build if no guard predicate was set.
    pub fn require_guard(mut self) -> Self {
        self.require_guard = true;
        self
    }

    /// Set where action failures of fire-and-forget runs are reported.
    pub fn fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.config.fault_policy = policy;
        self
    }

    /// Spawn runs on `handle` instead of the ambient runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.config.runtime = Some(handle);
        self
    }

    /// Forward every observer of the command to `hub`.
    pub fn requery(mut self, hub: RequeryHub) -> Self {
        self.config.requery = Some(hub);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CommandConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a [`RelayCommand`] from the synchronous action.
    pub fn build_relay(self) -> Result<RelayCommand<P>, CommandError> {
        self.check_guard()?;
        let action = self.sync_action.ok_or(CommandError::MissingAction)?;
        Ok(RelayCommand::from_parts(self.config, action, self.guard))
    }

    /// Build a [`RelayAsyncCommand`] from the asynchronous action.
    pub fn build_async(self) -> Result<RelayAsyncCommand<P>, CommandError> {
        self.check_guard()?;
        let action = self.action.ok_or(CommandError::MissingAction)?;
        Ok(RelayAsyncCommand::from_parts(self.config, action, self.guard))
    }

    /// Build a [`SingleFlightCommand`] from the asynchronous action.
    pub fn build_single_flight(self) -> Result<SingleFlightCommand<P>, CommandError> {
        self.check_guard()?;
        let action = self.action.ok_or(CommandError::MissingAction)?;
        Ok(SingleFlightCommand::from_parts(
            self.config,
            action,
            self.guard,
        ))
    }

    fn check_guard(&self) -> Result<(), CommandError> {
        if self.require_guard && self.guard.is_none() {
            return Err(CommandError::MissingGuard);
        }
        Ok(())
    }
}
