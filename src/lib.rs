// ABOUTME: Root module for relay - single-flight async commands for UI bindings.
// ABOUTME: Re-exports all public types from submodules.

pub mod command;
pub mod error;
pub mod notify;
pub mod prelude;

pub use error::CommandError;
