// ABOUTME: Tests for RequeryHub - forwarding observers from attached signals.
// ABOUTME: Covers suggest, detach on unsubscribe, and shared clones.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    (count, move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_suggest_reaches_observers_of_all_signals() {
    let hub = RequeryHub::new();
    let first = ChangeSignal::new(Some(hub.clone()));
    let second = ChangeSignal::new(Some(hub.clone()));

    let (a, observer_a) = counter();
    let (b, observer_b) = counter();
    first.subscribe(observer_a);
    second.subscribe(observer_b);

    hub.suggest();
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(b.load(Ordering::SeqCst), 1);
    assert_eq!(hub.observer_count(), 2);
}

#[test]
fn test_signal_notify_does_not_reach_other_signals() {
    let hub = RequeryHub::new();
    let first = ChangeSignal::new(Some(hub.clone()));
    let second = ChangeSignal::new(Some(hub.clone()));

    let (a, observer_a) = counter();
    let (b, observer_b) = counter();
    first.subscribe(observer_a);
    second.subscribe(observer_b);

    first.notify();
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(b.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe_detaches_from_hub() {
    let hub = RequeryHub::new();
    let signal = ChangeSignal::new(Some(hub.clone()));

    let (count, observer) = counter();
    let id = signal.subscribe(observer);
    assert!(signal.unsubscribe(id));

    hub.suggest();
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(hub.observer_count(), 0);
}

#[test]
fn test_hub_clones_share_observers() {
    let hub = RequeryHub::new();
    let clone = hub.clone();
    let signal = ChangeSignal::new(Some(hub));

    let (count, observer) = counter();
    signal.subscribe(observer);

    clone.suggest();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropped_signal_detaches_from_hub() {
    let hub = RequeryHub::new();
    let (count, observer) = counter();
    let (_, other) = counter();

    let signal = ChangeSignal::new(Some(hub.clone()));
    assert!(signal.hub().is_some());
    signal.subscribe(observer);
    signal.subscribe(other);
    assert_eq!(hub.observer_count(), 2);

    drop(signal);
    assert_eq!(hub.observer_count(), 0);

    hub.suggest();
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_dropped_signal_keeps_other_signals_attached() {
    let hub = RequeryHub::new();
    let kept = ChangeSignal::new(Some(hub.clone()));
    let dropped = ChangeSignal::new(Some(hub.clone()));

    let (count, observer) = counter();
    kept.subscribe(observer);
    dropped.subscribe(|| {});
    drop(dropped);

    hub.suggest();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(hub.observer_count(), 1);
}
