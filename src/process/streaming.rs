//! Live output of running commands
//!
//! A [`ProcessRunner`](crate::process::ProcessRunner) reports every command
//! it starts and, for echoing commands, every output line as soon as the
//! child writes it. The CLI renders these to the terminal; tests collect them.

use crate::process::CommandSpec;

/// Receives command announcements and output lines while commands run
///
/// This trait is object-safe and can be used as `&dyn OutputSink`.
pub trait OutputSink: Send + Sync {
    /// Called before a command is spawned
    fn on_command(&self, _spec: &CommandSpec) {}

    /// Called for each output line of an echoing command
    ///
    /// The line has no trailing newline.
    fn on_line(&self, line: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Default)]
pub struct NoopSink;

impl OutputSink for NoopSink {
    fn on_line(&self, _line: &str) {}
}
