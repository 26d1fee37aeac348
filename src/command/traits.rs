// ABOUTME: Defines the Command and AsyncCommand traits plus the action type aliases.
// ABOUTME: Commands answer can_execute, run on execute, and publish change signals.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::CommandError;
use crate::notify::{ChangeSignal, SubscriptionId};

/// Future returned by an asynchronous action.
pub type ActionFuture = BoxFuture<'static, Result<(), anyhow::Error>>;

/// Asynchronous action bound to a command.
pub type Action<P> = Arc<dyn Fn(P) -> ActionFuture + Send + Sync>;

/// Synchronous action bound to a [`RelayCommand`](super::RelayCommand).
pub type SyncAction<P> = Arc<dyn Fn(P) + Send + Sync>;

/// Predicate gating whether a command may run for a parameter.
pub type Guard<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

pub(crate) fn boxed_action<P, F, Fut>(action: F) -> Action<P>
where
    P: 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
{
    Arc::new(move |parameter: P| -> ActionFuture { Box::pin(action(parameter)) })
}

pub(crate) fn boxed_guard<P, G>(guard: G) -> Guard<P>
where
    G: Fn(&P) -> bool + Send + Sync + 'static,
{
    Arc::new(guard)
}

/// An invokable operation that UI code can query and trigger.
pub trait Command<P>: Send + Sync {
    /// Whether the command may currently be invoked with `parameter`.
    fn can_execute(&self, parameter: &P) -> bool;

    /// Invoke the command. Never blocks on asynchronous work.
    fn execute(&self, parameter: P);

    /// The "can execute changed" signal of this command.
    fn signal(&self) -> &ChangeSignal;

    /// Ask every observer to re-query `can_execute`.
    fn refresh(&self) {
        self.signal().notify();
    }

    /// Register an observer of the change signal.
    fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
        Self: Sized,
    {
        self.signal().subscribe(observer)
    }

    /// Remove an observer. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.signal().unsubscribe(id)
    }
}

/// A command whose action can also be awaited directly.
#[async_trait]
pub trait AsyncCommand<P: Send + 'static>: Command<P> {
    /// Run the action and wait for its outcome.
    ///
    /// This bypasses any busy tracking; use `execute` for guarded dispatch.
    async fn execute_async(&self, parameter: P) -> Result<(), CommandError>;
}
