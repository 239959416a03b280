//! Release configuration
//!
//! Two layers:
//! - [`ReleaseSettings`]: project constants (paths, package id, registry URL,
//!   tool locations), optionally loaded from a YAML file.
//! - [`ReleaseConfig`]: the immutable, validated configuration of one run,
//!   built from the settings and the command-line flags.

use crate::core::error::ReleaseError;
use crate::core::version::{is_valid_version, DEV_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Project settings, every field defaulted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseSettings {
    /// Human-readable project name (display only)
    pub project_name: String,

    /// Trunk branch that releases are published from
    pub main_branch: String,

    /// Remote fetched before switching to the trunk branch
    pub remote: String,

    /// Library source folder, relative to the repository root
    pub source_dir: PathBuf,

    /// Folder receiving the package, relative to the repository root
    pub output_dir: PathBuf,

    /// Package id used to name the artifact
    pub package_id: String,

    /// Registry endpoint the package is pushed to
    pub registry_url: String,

    /// Build configuration passed to the packaging tool
    pub configuration: String,

    /// External tool locations
    pub tools: ToolPaths,
}

/// Executables invoked by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub dotnet: String,
    pub git: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dotnet: "dotnet".to_string(),
            git: "git".to_string(),
        }
    }
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            project_name: "shared-library".to_string(),
            main_branch: "main".to_string(),
            remote: "origin".to_string(),
            source_dir: PathBuf::from("src").join("shared-library"),
            output_dir: PathBuf::from("build"),
            package_id: "phis.shared-library".to_string(),
            registry_url: "https://nuget.theaurum.net/v3/index.json".to_string(),
            configuration: "Release".to_string(),
            tools: ToolPaths::default(),
        }
    }
}

impl ReleaseSettings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReleaseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| ReleaseError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}

/// Which steps a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseMode {
    /// Create the package only
    BuildOnly,
    /// Verify, sync, package, publish and tag
    BuildAndPublish,
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::BuildOnly => write!(f, "build-only"),
            ReleaseMode::BuildAndPublish => write!(f, "build-and-publish"),
        }
    }
}

/// Registry credential; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrySecret(String);

impl RegistrySecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RegistrySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RegistrySecret(***)")
    }
}

impl fmt::Display for RegistrySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Flag values as given on the command line, before validation
#[derive(Debug, Clone, Default)]
pub struct ReleaseFlags {
    pub push: bool,
    pub build_version: Option<String>,
    pub nuget_password: Option<String>,
}

/// Validated configuration of a single run
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    mode: ReleaseMode,
    version: String,
    secret: Option<RegistrySecret>,
    settings: ReleaseSettings,
    repo_root: PathBuf,
}

impl ReleaseConfig {
    /// Validate flags against the settings and build the run configuration
    ///
    /// A version is validated whenever it is given; a secret must be
    /// non-empty whenever it is given. Publish mode additionally requires
    /// both, and every missing flag is reported at once.
    pub fn resolve(
        flags: ReleaseFlags,
        settings: ReleaseSettings,
        repo_root: impl Into<PathBuf>,
    ) -> Result<Self, ReleaseError> {
        if let Some(version) = &flags.build_version {
            if !is_valid_version(version) {
                return Err(ReleaseError::config(format!(
                    "BUILD_VERSION='{}' is not valid. Valid versions examples: \"123.123.123\", \"1.2.3\", \"1.2.123\"",
                    version
                )));
            }
        }

        if let Some(password) = &flags.nuget_password {
            if password.is_empty() {
                return Err(ReleaseError::config("NUGET_PASSWORD must not be empty"));
            }
        }

        let mode = if flags.push {
            let mut missing = Vec::new();
            if flags.build_version.is_none() {
                missing.push("-BUILD_VERSION");
            }
            if flags.nuget_password.is_none() {
                missing.push("-NUGET_PASSWORD");
            }
            if !missing.is_empty() {
                return Err(ReleaseError::config(format!(
                    "\"-PUSH\" is set but some required args are missing: {}",
                    missing.join(", ")
                )));
            }
            ReleaseMode::BuildAndPublish
        } else {
            ReleaseMode::BuildOnly
        };

        Ok(Self {
            mode,
            version: flags.build_version.unwrap_or_else(|| DEV_VERSION.to_string()),
            secret: flags.nuget_password.map(RegistrySecret::new),
            settings,
            repo_root: repo_root.into(),
        })
    }

    pub fn mode(&self) -> ReleaseMode {
        self.mode
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Registry secret; always present in publish mode
    pub fn secret(&self) -> Option<&RegistrySecret> {
        self.secret.as_ref()
    }

    pub fn settings(&self) -> &ReleaseSettings {
        &self.settings
    }

    /// Working directory of version-control commands
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Library source folder (working directory of the packaging tool)
    pub fn source_dir(&self) -> PathBuf {
        self.repo_root.join(&self.settings.source_dir)
    }

    /// Folder the package is written to
    pub fn output_dir(&self) -> PathBuf {
        self.repo_root.join(&self.settings.output_dir)
    }

    /// `<package_id>.<version>.nupkg`
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}.nupkg", self.settings.package_id, self.version)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir().join(self.artifact_file_name())
    }

    /// `v<version>`
    pub fn tag_name(&self) -> String {
        format!("v{}", self.version)
    }

    /// Annotated tag message naming the version and the artifact
    pub fn tag_message(&self) -> String {
        format!("{}\n{}", self.tag_name(), self.artifact_file_name())
    }
}
