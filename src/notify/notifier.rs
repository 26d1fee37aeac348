// ABOUTME: Implements Notifier - a thread-safe multicast observer list.
// ABOUTME: Delivery iterates a snapshot so observers may re-enter freely.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Callback registered with a [`Notifier`].
pub type Observer<E> = Arc<dyn Fn(&E) + Send + Sync>;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Handle identifying one registered observer.
///
/// Ids are unique across the whole process, so the same id can be used to
/// register one observer with several notifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Multicast list of observers for events of type `E`.
///
/// Observers are called synchronously, in registration order. The lock is
/// released before any observer runs.
pub struct Notifier<E> {
    observers: Mutex<Vec<(SubscriptionId, Observer<E>)>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Notifier<E> {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer, returning its subscription handle.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.insert(id, Arc::new(observer));
        id
    }

    /// Register an already shared observer under a caller-chosen id.
    pub(crate) fn insert(&self, id: SubscriptionId, observer: Observer<E>) {
        self.observers.lock().push((id, observer));
    }

    /// Remove an observer.
    ///
    /// Returns false if the id was not registered; that is not an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock();
        match observers.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every currently registered observer with `event`.
    ///
    /// Observers subscribed during delivery are first called on the next
    /// pass; observers removed during delivery still see the current one.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Observer<E>> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in snapshot {
            observer(event);
        }
    }

    pub(crate) fn ids(&self) -> Vec<SubscriptionId> {
        self.observers.lock().iter().map(|(id, _)| *id).collect()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    /// Returns true if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.observers.lock().is_empty()
    }

    /// Drop every observer.
    pub fn clear(&self) {
        self.observers.lock().clear();
    }
}
