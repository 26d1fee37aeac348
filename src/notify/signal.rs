// ABOUTME: ChangeSignal - the "can execute changed" stream of a command.
// ABOUTME: Payload-free notifications, optionally mirrored onto a RequeryHub.

use std::sync::Arc;

use super::{Notifier, Observer, RequeryHub, SubscriptionId};

/// Payload-free "something changed, re-query me" signal.
#[derive(Default)]
pub struct ChangeSignal {
    observers: Notifier<()>,
    hub: Option<RequeryHub>,
}

impl ChangeSignal {
    /// Create a signal, optionally attached to a requery hub.
    pub fn new(hub: Option<RequeryHub>) -> Self {
        Self {
            observers: Notifier::new(),
            hub,
        }
    }

    /// Register an observer.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        let observer: Observer<()> = Arc::new(move |_: &()| observer());
        if let Some(hub) = &self.hub {
            hub.attach(id, Arc::clone(&observer));
        }
        self.observers.insert(id, observer);
        id
    }

    /// Remove an observer. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if let Some(hub) = &self.hub {
            hub.detach(id);
        }
        self.observers.unsubscribe(id)
    }

    /// Invoke every observer of this signal.
    ///
    /// Only this signal's observers are called, not the whole hub.
    pub fn notify(&self) {
        self.observers.notify(&());
    }

    /// Number of observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// The hub this signal forwards to, if any.
    pub fn hub(&self) -> Option<&RequeryHub> {
        self.hub.as_ref()
    }
}

impl Drop for ChangeSignal {
    fn drop(&mut self) {
        if let Some(hub) = &self.hub {
            for id in self.observers.ids() {
                hub.detach(id);
            }
        }
    }
}
