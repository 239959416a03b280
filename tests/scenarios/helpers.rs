//! Test utilities for release scenarios

use async_trait::async_trait;
use release_pipeline::core::{ReleaseConfig, ReleaseError, ReleaseFlags, ReleaseSettings};
use release_pipeline::process::{CommandResult, CommandSpec, ProcessRunner};
use release_pipeline::{Orchestrator, PipelineOutcome};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Scripted reaction to commands starting with a prefix
#[derive(Debug, Clone)]
enum Reaction {
    Output(String),
    Fail(i32),
    CreateFile(PathBuf),
}

/// Process runner double that records every command it is asked to run
///
/// Commands succeed with empty output unless a reaction matches the start
/// of their displayed command line.
#[derive(Debug, Clone, Default)]
pub struct SpyRunner {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    reactions: Arc<Mutex<Vec<(String, Reaction)>>>,
}

impl SpyRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` to commands starting with `prefix`
    pub fn with_output(self, prefix: &str, output: &str) -> Self {
        self.react(prefix, Reaction::Output(output.to_string()))
    }

    /// Exit with `code` for commands starting with `prefix`
    pub fn failing(self, prefix: &str, code: i32) -> Self {
        self.react(prefix, Reaction::Fail(code))
    }

    /// Create `path` (and its parents) when a command starting with `prefix` runs
    pub fn creating_file(self, prefix: &str, path: impl Into<PathBuf>) -> Self {
        self.react(prefix, Reaction::CreateFile(path.into()))
    }

    fn react(self, prefix: &str, reaction: Reaction) -> Self {
        self.reactions
            .lock()
            .unwrap()
            .push((prefix.to_string(), reaction));
        self
    }

    /// Every command run so far
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Displayed command lines run so far
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display).collect()
    }
}

#[async_trait]
impl ProcessRunner for SpyRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ReleaseError> {
        self.calls.lock().unwrap().push(spec.clone());

        let command = spec.display();
        let reaction = self
            .reactions
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, reaction)| reaction.clone());

        match reaction {
            None => Ok(CommandResult::new("")),
            Some(Reaction::Output(output)) => Ok(CommandResult::new(output)),
            Some(Reaction::Fail(code)) => Err(ReleaseError::CommandFailed {
                command,
                code: Some(code),
            }),
            Some(Reaction::CreateFile(path)) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(&path, b"package").unwrap();
                Ok(CommandResult::new(format!(
                    "Successfully created package '{}'.\n",
                    path.display()
                )))
            }
        }
    }
}

/// Flags for a complete publish run
pub fn publish_flags(version: &str) -> ReleaseFlags {
    ReleaseFlags {
        push: true,
        build_version: Some(version.to_string()),
        nuget_password: Some("api-key-0001".to_string()),
    }
}

/// Resolve a configuration rooted at `root`, with the library source folder created
pub fn config_in(root: &Path, flags: ReleaseFlags) -> Result<ReleaseConfig, ReleaseError> {
    let settings = ReleaseSettings::default();
    std::fs::create_dir_all(root.join(&settings.source_dir)).unwrap();
    ReleaseConfig::resolve(flags, settings, root)
}

/// Run the orchestrator with a spy and return the outcome
pub async fn run_with_spy(config: &ReleaseConfig, spy: &SpyRunner) -> PipelineOutcome {
    Orchestrator::new(spy.clone()).run(config).await
}

/// Assert the exact command lines that ran
pub fn assert_commands(spy: &SpyRunner, expected: &[&str]) {
    let commands = spy.commands();
    assert_eq!(
        commands, expected,
        "Commands run:\n{}\n\nexpected:\n{}",
        commands.join("\n"),
        expected.join("\n")
    );
}
