//! Command-line interface

pub mod output;

use crate::core::{ReleaseError, ReleaseFlags};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Package a NuGet library and, with `-PUSH`, publish and tag the release
#[derive(Debug, Parser, Clone)]
#[command(name = "release-pipeline")]
#[command(author = "Release Pipeline Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Package, publish and tag a NuGet library release", long_about = None)]
pub struct Cli {
    /// Verify, sync trunk, package, push to the registry and tag (alias: -PUSH)
    #[arg(long)]
    pub push: bool,

    /// Release version, e.g. 1.2.3 (alias: -BUILD_VERSION)
    #[arg(long, value_name = "VERSION")]
    pub build_version: Option<String>,

    /// Registry API key (alias: -NUGET_PASSWORD)
    #[arg(long, env = "NUGET_PASSWORD", hide_env_values = true, value_name = "KEY")]
    pub nuget_password: Option<String>,

    /// Path to a YAML settings file; its folder is the repository root
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Flags understood in both legacy (`-PUSH`) and long (`--push`) form
const KNOWN_FLAGS: &[(&str, &str, bool)] = &[
    // (legacy name, long form, takes a value)
    ("-PUSH", "--push", false),
    ("-BUILD_VERSION", "--build-version", true),
    ("-NUGET_PASSWORD", "--nuget-password", true),
];

/// Match a token against the release flags, case-insensitively
fn known_flag(token: &str) -> Option<&'static (&'static str, &'static str, bool)> {
    let name = token.split('=').next().unwrap_or(token);
    KNOWN_FLAGS.iter().find(|(legacy, long, _)| {
        name.eq_ignore_ascii_case(legacy) || name.eq_ignore_ascii_case(long)
    })
}

/// Rewrite legacy flags into the long form clap parses
///
/// `-push`, `-Build_Version 1.2.3` and friends become `--push`,
/// `--build-version=1.2.3`. A release flag given twice, in any spelling, is
/// a configuration error. The token after a value-taking flag is always its
/// value, even when it starts with `-`; it is joined to the flag as
/// `--nuget-password=<value>` so clap cannot read it as another flag.
pub fn translate_legacy_flags<I, T>(args: I) -> Result<Vec<OsString>, ReleaseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut translated = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    let mut pending: Option<&str> = None;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();

        if index == 0 {
            translated.push(arg);
            continue;
        }

        if let Some(long) = pending.take() {
            let mut joined = OsString::from(format!("{}=", long));
            joined.push(&arg);
            translated.push(joined);
            continue;
        }

        let Some(token) = arg.to_str() else {
            translated.push(arg);
            continue;
        };

        match known_flag(token) {
            Some(&(legacy, long, takes_value)) => {
                if seen.contains(&legacy) {
                    return Err(ReleaseError::config(format!(
                        "\"{}\" is already defined",
                        legacy
                    )));
                }
                seen.push(legacy);

                match token.split_once('=') {
                    Some((_, value)) => translated.push(format!("{}={}", long, value).into()),
                    None if takes_value => pending = Some(long),
                    None => translated.push(long.into()),
                }
            }
            None => translated.push(arg),
        }
    }

    // A trailing value flag is left for clap to report as missing its value
    if let Some(long) = pending {
        translated.push(long.into());
    }

    Ok(translated)
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Result<Self, ReleaseError> {
        Self::try_parse_from(std::env::args_os())
    }

    /// Parse CLI arguments from a slice, accepting legacy flags
    ///
    /// `--help` and `--version` print and exit the process.
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, ReleaseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = translate_legacy_flags(itr)?;
        match <Self as Parser>::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e)
                if matches!(
                    e.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) =>
            {
                e.exit()
            }
            Err(e) => Err(ReleaseError::config(e.to_string().trim_end())),
        }
    }

    /// Release flags for config resolution
    pub fn flags(&self) -> ReleaseFlags {
        ReleaseFlags {
            push: self.push,
            build_version: self.build_version.clone(),
            nuget_password: self.nuget_password.clone(),
        }
    }
}
