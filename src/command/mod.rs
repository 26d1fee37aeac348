// ABOUTME: Command module - relay, async, and single-flight commands.
// ABOUTME: Core abstraction for UI-triggerable operations with observable state.

mod builder;
mod config;
mod executor;
mod fault;
mod relay;
mod relay_async;
mod run_handle;
mod single_flight;
mod traits;

pub use builder::*;
pub use config::*;
pub use fault::*;
pub use relay::*;
pub use relay_async::*;
pub use run_handle::*;
pub use single_flight::*;
pub use traits::*;
