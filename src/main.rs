use anyhow::{Context, Result};
use release_pipeline::cli::output::{
    print_config_summary, print_event, print_failure, print_header, print_outcome, TerminalSink,
};
use release_pipeline::cli::Cli;
use release_pipeline::core::{ReleaseConfig, ReleaseSettings};
use release_pipeline::execution::Orchestrator;
use release_pipeline::process::SubprocessRunner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit status for a failed step
const EXIT_FAILED: i32 = 1;
/// Exit status for invalid flags or settings, nothing was run
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            print_failure(&e.to_string());
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    print_header("Build starting...");
    if !cli.push && cli.build_version.is_none() && cli.nuget_password.is_none() {
        print_header("No args given. Using dev build");
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            print_failure(&format!("{:#}", e));
            std::process::exit(EXIT_CONFIG);
        }
    };
    print_config_summary(&config);

    let sink = TerminalSink::new(config.repo_root());
    let mut orchestrator = Orchestrator::new(SubprocessRunner::new(Arc::new(sink)));
    orchestrator.add_event_handler(print_event);

    let outcome = orchestrator.run(&config).await;
    print_outcome(&outcome, config.mode());

    if !outcome.is_success() {
        std::process::exit(EXIT_FAILED);
    }

    Ok(())
}

/// Settings file (if any), repository root and flags into a run configuration
fn resolve_config(cli: &Cli) -> Result<ReleaseConfig> {
    let (settings, repo_root) = match &cli.config {
        Some(path) => {
            let settings = ReleaseSettings::from_file(path)?;
            let root = path
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", path.display()))?
                .parent()
                .map(PathBuf::from)
                .context("Settings file has no parent folder")?;
            (settings, root)
        }
        None => (
            ReleaseSettings::default(),
            std::env::current_dir().context("Failed to read current directory")?,
        ),
    };
    debug!("Repository root: {}", repo_root.display());

    Ok(ReleaseConfig::resolve(cli.flags(), settings, repo_root)?)
}
