// ABOUTME: SingleFlightCommand - an async command that runs at most once at a time.
// ABOUTME: Tracks the in-flight run as a busy marker and publishes both transitions.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, ReentrantMutex};

use super::executor::spawn_action;
use super::run_handle::FinishOnDrop;
use super::traits::{boxed_action, boxed_guard};
use super::{
    Action, AsyncCommand, Command, CommandBuilder, CommandConfig, Guard, RunHandle, RunId,
    RunMarker,
};
use crate::error::CommandError;
use crate::notify::{ChangeSignal, IS_BUSY, Notifier, PropertyChanged, SubscriptionId};

struct Inner<P> {
    config: CommandConfig,
    action: Action<P>,
    guard: Option<Guard<P>>,
    /// Busy marker: `Some` exactly while a run started by `trigger_execution` is in flight.
    marker: Mutex<Option<RunMarker>>,
    /// Held across each marker change and its publication so transitions of
    /// one instance are delivered one at a time. Reentrant for observers
    /// that call back into the command.
    transition: ReentrantMutex<()>,
    signal: ChangeSignal,
    properties: Notifier<PropertyChanged>,
}

impl<P> Inner<P> {
    fn publish_busy_changed(&self) {
        self.properties.notify(&PropertyChanged::new(IS_BUSY));
        self.signal.notify();
    }

    /// Clear the marker if it still belongs to `run_id`, then publish.
    fn clear_marker(&self, run_id: RunId) {
        let _transition = self.transition.lock();
        let cleared = {
            let mut marker = self.marker.lock();
            if marker.as_ref().is_some_and(|current| current.run_id == run_id) {
                *marker = None;
                true
            } else {
                false
            }
        };

        if cleared {
            self.publish_busy_changed();
        }
    }
}

/// Asynchronous command that permits a single in-flight run.
///
/// While a run started by [`trigger_execution`](Self::trigger_execution) is
/// in flight, [`is_busy`](Self::is_busy) is true and
/// [`can_execute`](Self::can_execute) is false for every parameter. Each run
/// publishes exactly two busy-state notifications: one before
/// `trigger_execution` returns and one after the action settles, whether it
/// succeeded, failed or panicked.
///
/// Clones share the same busy marker and observers.
pub struct SingleFlightCommand<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for SingleFlightCommand<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Send + 'static> SingleFlightCommand<P> {
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
                marker: Mutex::new(None),
                transition: ReentrantMutex::new(()),
                signal,
                properties: Notifier::new(),
            }),
        }
    }

    /// Label used in log events.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Whether a run is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.marker.lock().is_some()
    }

    /// The busy marker of the in-flight run, if any.
    pub fn current_run(&self) -> Option<RunMarker> {
        self.inner.marker.lock().clone()
    }

    /// False while busy; otherwise the guard's verdict, or true without a guard.
    pub fn can_execute(&self, parameter: &P) -> bool {
        if self.is_busy() {
            return false;
        }

        match &self.inner.guard {
            Some(guard) => guard(parameter),
            None => true,
        }
    }

    /// Register an observer of property changes (currently only `is_busy`).
    pub fn subscribe_property<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        self.inner.properties.subscribe(observer)
    }

    /// Remove a property observer. Unknown ids are ignored.
    pub fn unsubscribe_property(&self, id: SubscriptionId) -> bool {
        self.inner.properties.unsubscribe(id)
    }

    /// Start a run and return without waiting for it.
    ///
    /// The busy marker is set and both notification sinks are called before
    /// this returns. The action then runs on the configured runtime; when it
    /// settles the marker is cleared and both sinks are called again, before
    /// the returned handle completes and before any fault is reported.
    ///
    /// The guard predicate is not consulted here; callers check
    /// [`can_execute`](Self::can_execute) first. Returns
    /// [`CommandError::Busy`] without notifying if a run is already in flight.
    pub fn trigger_execution(&self, parameter: P) -> Result<RunHandle, CommandError> {
        let runtime = self.inner.config.spawn_handle()?;

        // Waits for another thread's transition to finish publishing.
        let transition = self.inner.transition.lock();
        let run_id = {
            let mut marker = self.inner.marker.lock();
            if let Some(current) = marker.as_ref() {
                tracing::debug!(
                    command = %self.inner.config.name,
                    run_id = %current.run_id,
                    "trigger refused, command busy"
                );
                return Err(CommandError::Busy {
                    run_id: current.run_id,
                });
            }
            let fresh = RunMarker::new();
            let run_id = fresh.run_id;
            *marker = Some(fresh);
            run_id
        };

        tracing::debug!(command = %self.inner.config.name, %run_id, "run started");
        self.inner.publish_busy_changed();
        drop(transition);

        let handle = RunHandle::new(run_id);
        let run = handle.clone();
        let inner = Arc::clone(&self.inner);
        spawn_action(
            &runtime,
            Arc::clone(&self.inner.action),
            parameter,
            move |result| {
                let finish = FinishOnDrop::new(run, result);
                inner.clear_marker(run_id);
                tracing::debug!(
                    command = %inner.config.name,
                    %run_id,
                    ok = finish.error().is_none(),
                    "run finished"
                );
                if let Some(error) = finish.error() {
                    inner.config.fault_policy.report(&inner.config.name, run_id, error);
                }
            },
        );

        Ok(handle)
    }
}

impl<P: Send + 'static> Command<P> for SingleFlightCommand<P> {
    fn can_execute(&self, parameter: &P) -> bool {
        SingleFlightCommand::can_execute(self, parameter)
    }

    fn execute(&self, parameter: P) {
        match self.trigger_execution(parameter) {
            Ok(_) => {}
            Err(CommandError::Busy { .. }) => {}
            Err(error) => {
                tracing::warn!(command = %self.inner.config.name, %error, "command dispatch failed");
            }
        }
    }

    fn signal(&self) -> &ChangeSignal {
        &self.inner.signal
    }
}

#[async_trait]
impl<P: Send + 'static> AsyncCommand<P> for SingleFlightCommand<P> {
    async fn execute_async(&self, parameter: P) -> Result<(), CommandError> {
        let future = (self.inner.action)(parameter);
        future.await.map_err(CommandError::Action)
    }
}

impl<P> std::fmt::Debug for SingleFlightCommand<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlightCommand")
            .field("name", &self.inner.config.name)
            .field("marker", &*self.inner.marker.lock())
            .finish()
    }
}
