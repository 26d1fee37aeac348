// ABOUTME: Notification module - observer lists and change signals for commands.
// ABOUTME: Shared plumbing behind can-execute and property-changed notifications.

mod notifier;
mod property;
mod requery;
mod signal;

pub use notifier::*;
pub use property::*;
pub use requery::*;
pub use signal::*;

#[cfg(test)]
mod requery_test;
