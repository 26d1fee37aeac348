// ABOUTME: RequeryHub - an injected "re-query every command" collaborator.
// ABOUTME: Commands attached to a hub forward their observers to it.

use std::sync::Arc;

use super::{Notifier, Observer, SubscriptionId};

/// Shared hub that asks every attached observer to re-query its command.
///
/// A hub is passed to commands at construction. Every observer subscribed
/// to such a command is also registered here, so one [`suggest`] call
/// reaches all of them. Clones share the same observer list.
///
/// [`suggest`]: RequeryHub::suggest
#[derive(Clone, Default)]
pub struct RequeryHub {
    observers: Arc<Notifier<()>>,
}

impl RequeryHub {
    /// Create a hub with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify every observer registered through an attached command.
    pub fn suggest(&self) {
        tracing::trace!(observers = self.observers.len(), "requery suggested");
        self.observers.notify(&());
    }

    /// Number of observers currently reachable through this hub.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn attach(&self, id: SubscriptionId, observer: Observer<()>) {
        self.observers.insert(id, observer);
    }

    pub(crate) fn detach(&self, id: SubscriptionId) {
        self.observers.unsubscribe(id);
    }
}

impl std::fmt::Debug for RequeryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequeryHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}
