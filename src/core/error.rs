//! Error types for release runs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a release run
///
/// Every variant is fatal: the orchestrator stops at the first one and
/// reports it as the cause of the failed run.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Invalid, missing or duplicated command-line input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The settings file could not be read or parsed
    #[error("Failed to load settings from {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// An external command exited with a non-zero status
    #[error("Error while trying to execute command: \"{command}\"{}", exit_suffix(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// An external command could not be started at all
    #[error("Failed to start command \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The working directory of a command does not exist
    #[error("Working directory does not exist: {}", .path.display())]
    MissingWorkingDirectory { path: PathBuf },

    /// The version-control working tree has pending modifications
    #[error("Project got pending changes:\n{entries}")]
    UncommittedChanges { entries: String },

    /// Filesystem housekeeping (output folder cleanup) failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {})", code),
        None => " (terminated by signal)".to_string(),
    }
}

impl ReleaseError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ReleaseError::Configuration(message.into())
    }

    /// Whether the error was raised before any external command could run
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReleaseError::Configuration(_) | ReleaseError::Settings { .. }
        )
    }
}
