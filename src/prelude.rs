// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use relay::prelude::*;` to get started quickly.

pub use crate::command::{
    AsyncCommand, Command, CommandBuilder, CommandConfig, FaultPolicy, RelayAsyncCommand,
    RelayCommand, RunHandle, RunId, RunMarker, RunStatus, SingleFlightCommand,
};
pub use crate::error::CommandError;
pub use crate::notify::{
    ChangeSignal, IS_BUSY, Notifier, PropertyChanged, RequeryHub, SubscriptionId,
};
