// ABOUTME: Property-changed notifications for observable command state.
// ABOUTME: Carries the name of the property whose value changed.

/// Name of the busy-state property published by single-flight commands.
pub const IS_BUSY: &str = "is_busy";

/// Payload delivered to property observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    /// Name of the property that changed.
    pub name: &'static str,
}

impl PropertyChanged {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns true if this event is about `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
