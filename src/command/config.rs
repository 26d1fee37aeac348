// ABOUTME: CommandConfig - settings shared by every command variant.
// ABOUTME: Name for logs, fault policy, runtime to spawn on, and requery hub.

use tokio::runtime::Handle;

use super::FaultPolicy;
use crate::error::CommandError;
use crate::notify::{ChangeSignal, RequeryHub};

/// Settings shared by every command variant.
#[derive(Clone, Debug)]
pub struct CommandConfig {
    /// Label used in log events.
    pub name: String,
    /// Where failures of fire-and-forget runs are reported.
    pub fault_policy: FaultPolicy,
    /// Runtime to spawn runs on. `None` means the ambient runtime.
    pub runtime: Option<Handle>,
    /// Hub that receives every observer subscribed to the command.
    pub requery: Option<RequeryHub>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: "command".to_string(),
            fault_policy: FaultPolicy::default(),
            runtime: None,
            requery: None,
        }
    }
}

impl CommandConfig {
    pub(crate) fn spawn_handle(&self) -> Result<Handle, CommandError> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|_| CommandError::NoRuntime),
        }
    }

    pub(crate) fn change_signal(&self) -> ChangeSignal {
        ChangeSignal::new(self.requery.clone())
    }
}
