//! Pipeline step domain model

use crate::core::{config::ReleaseConfig, error::ReleaseError};
use crate::process::CommandSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named unit of work in a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Refuse to publish from a dirty working tree
    VerifyClean,
    /// Reset the checkout to the latest trunk
    SyncTrunk,
    /// Build the package into a fresh output folder
    CreatePackage,
    /// Push the package to the registry
    PublishToRegistry,
    /// Tag the release and push the tags
    TagRelease,
}

/// What a step does to the output folder before running its commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCleanup {
    None,
    RemoveOutputDir,
}

impl PipelineStep {
    /// Stable identifier used in logs and events
    pub fn id(&self) -> &'static str {
        match self {
            PipelineStep::VerifyClean => "verify-clean",
            PipelineStep::SyncTrunk => "sync-trunk",
            PipelineStep::CreatePackage => "create-package",
            PipelineStep::PublishToRegistry => "publish-to-registry",
            PipelineStep::TagRelease => "tag-release",
        }
    }

    /// Header shown when the step starts
    pub fn title(&self) -> &'static str {
        match self {
            PipelineStep::VerifyClean => "Checking if project got pending changes",
            PipelineStep::SyncTrunk => "Switching to main branch",
            PipelineStep::CreatePackage => "Creating nuget package",
            PipelineStep::PublishToRegistry => "Pushing nuget package to nuget server",
            PipelineStep::TagRelease => "Pushing build tag to git",
        }
    }

    /// Whether the output folder is removed before the commands run
    pub fn output_cleanup(&self) -> OutputCleanup {
        match self {
            PipelineStep::CreatePackage | PipelineStep::TagRelease => {
                OutputCleanup::RemoveOutputDir
            }
            _ => OutputCleanup::None,
        }
    }

    /// Commands the step runs, in order
    pub fn commands(&self, config: &ReleaseConfig) -> Result<Vec<CommandSpec>, ReleaseError> {
        let settings = config.settings();
        let git = |args: &[&str]| {
            CommandSpec::new(settings.tools.git.as_str(), config.repo_root()).args(args.iter().copied())
        };

        let commands = match self {
            PipelineStep::VerifyClean => vec![git(&["status", "--porcelain"])],
            PipelineStep::SyncTrunk => vec![
                git(&["fetch", settings.remote.as_str(), "-v"]),
                git(&["switch", "-f", settings.main_branch.as_str()]),
                git(&["reset", "--hard", "HEAD"]),
                git(&["pull"]),
                git(&["clean", "-d", "-f"]),
            ],
            PipelineStep::CreatePackage => vec![CommandSpec::new(
                settings.tools.dotnet.as_str(),
                config.source_dir(),
            )
            .args(["pack", "-c", settings.configuration.as_str()])
            .arg(format!("/p:Version={}", config.version()))
            .arg("-o")
            .arg(config.output_dir().to_string_lossy())],
            PipelineStep::PublishToRegistry => {
                let secret = config.secret().ok_or_else(|| {
                    ReleaseError::config("a registry secret is required to publish")
                })?;
                vec![CommandSpec::new(settings.tools.dotnet.as_str(), config.repo_root())
                    .args(["nuget", "push", "-s", settings.registry_url.as_str(), "-k"])
                    .secret_arg(secret.expose())
                    .arg(config.artifact_path().to_string_lossy())
                    .arg("--skip-duplicate")]
            }
            PipelineStep::TagRelease => vec![
                git(&["tag", "-a"])
                    .arg(config.tag_name())
                    .arg("-m")
                    .arg(config.tag_message()),
                git(&["push", "--tags"]),
            ],
        };

        Ok(commands)
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
