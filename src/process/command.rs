//! Command descriptions and results

use std::path::{Path, PathBuf};

/// Placeholder shown instead of secret arguments
pub const MASK: &str = "***";

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,

    /// Arguments, in order
    pub args: Vec<String>,

    /// Directory the command runs in; must exist when the command starts
    pub working_dir: PathBuf,

    /// Echo each output line as it arrives
    pub echo: bool,

    /// Argument values replaced by [`MASK`] when the command is displayed
    secrets: Vec<String>,
}

impl CommandSpec {
    /// Create a command that echoes its output
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            echo: true,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an argument that must never be displayed
    pub fn secret_arg(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.args.push(secret.clone());
        if !secret.is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    /// Run without echoing output lines
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Program followed by its arguments, as one string
    ///
    /// Secret arguments are masked; this is the form used in logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(|arg| {
                if self.secrets.iter().any(|secret| secret == arg) {
                    MASK
                } else {
                    arg.as_str()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Program and arguments as tokens, unmasked
    pub fn tokens(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Output of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Combined stdout and stderr, one `\n`-terminated line per output line
    pub output: String,

    /// Exit code, if the process exited normally
    pub code: Option<i32>,
}

impl CommandResult {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            code: Some(0),
        }
    }

    /// Whether the command printed anything at all, blank lines included
    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }
}
