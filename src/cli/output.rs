//! CLI output formatting

use crate::{
    core::{ExecutionStatus, PipelineOutcome, ReleaseConfig, ReleaseMode, StepStatus},
    execution::ExecutionEvent,
    process::{CommandSpec, OutputSink},
};
use console::Emoji;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Widest header rule drawn, in columns
const HEADER_WIDTH: usize = 57;

fn rule() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w.min(HEADER_WIDTH))
        .unwrap_or(HEADER_WIDTH);
    "=".repeat(width)
}

/// Print a section header between two rules
pub fn print_header(text: &str) {
    let rule = rule();
    println!(
        "\n{}\n{}\n{}",
        style(&rule).blue().bold(),
        style(text).blue().bold().underlined(),
        style(&rule).blue().bold()
    );
    let _ = io::stdout().flush();
}

/// Print the resolved configuration; the secret is masked
pub fn print_config_summary(config: &ReleaseConfig) {
    let settings = config.settings();
    let rows: Vec<(&str, String)> = vec![
        ("project", settings.project_name.clone()),
        ("repository", config.repo_root().display().to_string()),
        ("source", config.source_dir().display().to_string()),
        ("output", config.output_dir().display().to_string()),
        ("version", config.version().to_string()),
        ("registry", settings.registry_url.clone()),
        ("mode", config.mode().to_string()),
    ];

    println!("{}", style(rule()).green());
    for (key, value) in rows {
        println!("  {:<11} {}", style(key).dim(), style(value).green());
    }
    if let Some(secret) = config.secret() {
        println!("  {:<11} {}", style("secret").dim(), style(secret).green());
    }
    println!("{}", style(rule()).green());
}

/// Terminal sink: announces commands and echoes their output in green
#[derive(Debug, Clone)]
pub struct TerminalSink {
    /// Working directory not worth repeating for every command
    default_dir: PathBuf,
}

impl TerminalSink {
    pub fn new(default_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_dir: default_dir.into(),
        }
    }
}

impl OutputSink for TerminalSink {
    fn on_command(&self, spec: &CommandSpec) {
        println!(
            "{}",
            style(format!("Executing command \"{}\"", spec.display())).green()
        );
        if spec.working_dir() != self.default_dir.as_path() {
            println!(
                "{}",
                style(format!(
                    "Working directory: \"{}\"",
                    spec.working_dir().display()
                ))
                .green()
            );
        }
        let _ = io::stdout().flush();
    }

    fn on_line(&self, line: &str) {
        println!("{}", style(line).green());
        let _ = io::stdout().flush();
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            mode,
            total_steps,
        } => Some(format!(
            "{} Starting {} run ({} steps, {})",
            ROCKET,
            style(mode).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        )),
        // Step starts are printed as headers, see `print_event`
        ExecutionEvent::StepStarted { .. } => None,
        ExecutionEvent::StepCompleted { step, elapsed } => Some(format!(
            "{} {} {}",
            CHECK,
            style(step).green(),
            style(format!("({})", format_duration(*elapsed))).dim()
        )),
        ExecutionEvent::StepFailed { step, error } => Some(format!(
            "{} {}: {}",
            CROSS,
            style(step).red(),
            style(error).dim()
        )),
        ExecutionEvent::PipelineCompleted { .. } => None,
    }
}

/// Render an event on the terminal
pub fn print_event(event: &ExecutionEvent) {
    if let ExecutionEvent::StepStarted {
        step,
        position,
        total_steps,
    } = event
    {
        print_header(&format!("[{}/{}] {}", position, total_steps, step.title()));
        return;
    }
    if let Some(line) = format_execution_event(event) {
        println!("{}", line);
    }
}

/// Format a run status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("SUCCESSFUL").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Print the final banner and per-step summary
pub fn print_outcome(outcome: &PipelineOutcome, mode: ReleaseMode) {
    println!();
    for record in outcome.records() {
        let icon = match record.status {
            StepStatus::Completed => CHECK,
            StepStatus::Failed => CROSS,
        };
        println!(
            "  {}{:<20} {}",
            icon,
            record.step.id(),
            style(format_duration(record.duration())).dim()
        );
    }

    let banner = format!("========== {} ===========", format_status(outcome.status()));
    match outcome.error() {
        None => println!("{} {}", banner, style(format!("({})", mode)).dim()),
        Some(error) => println!("{}\n{}", banner, style(error).red()),
    }
}

/// Print a configuration error before any step ran
pub fn print_failure(message: &str) {
    println!(
        "{}\n{}",
        style("========== FAILED ===========").red(),
        style(message).red()
    );
}

/// Human-readable duration
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
