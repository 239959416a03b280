//! Running external commands

pub mod command;
pub mod streaming;
pub mod subprocess;

use crate::core::ReleaseError;
use async_trait::async_trait;

pub use command::{CommandResult, CommandSpec, MASK};
pub use streaming::{NoopSink, OutputSink};
pub use subprocess::SubprocessRunner;

/// Trait for command execution - allows the pipeline to run against real
/// processes or a scripted double
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion
    ///
    /// Returns the captured output when the command exits with status 0 and
    /// [`ReleaseError::CommandFailed`] otherwise.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ReleaseError>;
}
