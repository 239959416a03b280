//! release-pipeline - package, publish and tag a NuGet library release

pub mod cli;
pub mod core;
pub mod execution;
pub mod process;

// Re-export commonly used types
pub use crate::core::{PipelineOutcome, PipelineStep, ReleaseConfig, ReleaseError, ReleaseMode};
pub use crate::execution::{ExecutionEvent, Orchestrator};
pub use crate::process::{CommandResult, CommandSpec, OutputSink, ProcessRunner, SubprocessRunner};
