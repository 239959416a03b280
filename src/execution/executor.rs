//! Step executor - runs individual steps with the process runner

use crate::{
    core::{OutputCleanup, PipelineStep, ReleaseConfig, ReleaseError},
    process::{CommandResult, ProcessRunner},
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Executes a single step
pub struct StepExecutor<R> {
    runner: R,
}

impl<R: ProcessRunner> StepExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Execute a step: cleanup, commands in order, then output checks
    ///
    /// Stops at the first failing command; nothing already done is undone.
    pub async fn execute(
        &self,
        step: PipelineStep,
        config: &ReleaseConfig,
    ) -> Result<(), ReleaseError> {
        info!("Executing step: {}", step);

        if step.output_cleanup() == OutputCleanup::RemoveOutputDir {
            remove_dir_if_exists(&config.output_dir())?;
        }

        let commands = step.commands(config)?;
        let mut results: Vec<CommandResult> = Vec::with_capacity(commands.len());
        for spec in &commands {
            results.push(self.runner.run(spec).await?);
        }

        if step == PipelineStep::VerifyClean {
            ensure_clean(&results)?;
        }

        if step == PipelineStep::CreatePackage {
            let artifact = config.artifact_path();
            if !artifact.is_file() {
                warn!("Expected package not found at {}", artifact.display());
            }
        }

        info!("Step {} completed successfully", step);
        Ok(())
    }
}

/// Fail with `UncommittedChanges` when the status query reported anything
fn ensure_clean(results: &[CommandResult]) -> Result<(), ReleaseError> {
    match results.iter().find(|r| r.has_output()) {
        Some(dirty) => Err(ReleaseError::UncommittedChanges {
            entries: dirty.output.trim_end().to_string(),
        }),
        None => Ok(()),
    }
}

/// Remove a directory tree; a missing directory is not an error
fn remove_dir_if_exists(path: &Path) -> Result<(), ReleaseError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ReleaseError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
