//! System process runner built on `tokio::process`

use crate::core::ReleaseError;
use crate::process::{CommandResult, CommandSpec, NoopSink, OutputSink, ProcessRunner};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How long to keep reading after the child exited while its pipes stay open
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Runs commands as child processes, streaming their combined output
#[derive(Clone)]
pub struct SubprocessRunner {
    sink: Arc<dyn OutputSink>,
}

impl SubprocessRunner {
    /// Create a runner that reports to the given sink
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }

    /// Create a runner that prints nothing
    pub fn silent() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    fn capture(&self, spec: &CommandSpec, output: &mut String, line: String) {
        if spec.echo {
            self.sink.on_line(&line);
        }
        output.push_str(&line);
        output.push('\n');
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for SubprocessRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessRunner").finish_non_exhaustive()
    }
}

/// Forward every line of `reader` to `tx` until EOF
///
/// Lines are decoded lossily so a stray non-UTF-8 byte never stops the
/// reader (a stopped reader would let the child block on a full pipe).
async fn forward_lines<T>(reader: T, tx: mpsc::UnboundedSender<String>)
where
    T: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Stopped reading command output: {}", e);
                break;
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ReleaseError> {
        let command = spec.display();

        if !spec.working_dir().is_dir() {
            return Err(ReleaseError::MissingWorkingDirectory {
                path: spec.working_dir().to_path_buf(),
            });
        }

        info!(dir = %spec.working_dir().display(), "Executing command \"{}\"", command);
        self.sink.on_command(spec);

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(spec.working_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ReleaseError::Spawn {
                command: command.clone(),
                source,
            })?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut output = String::new();

        let status = loop {
            tokio::select! {
                biased;
                Some(line) = rx.recv() => self.capture(spec, &mut output, line),
                status = child.wait() => {
                    break status.map_err(|source| ReleaseError::Spawn {
                        command: command.clone(),
                        source,
                    })?;
                }
            }
        };

        // The child is gone; pick up what the readers still hold, but do not
        // wait on pipes kept open by processes it left behind.
        loop {
            match timeout(DRAIN_GRACE, rx.recv()).await {
                Ok(Some(line)) => self.capture(spec, &mut output, line),
                Ok(None) => break,
                Err(_) => {
                    warn!("Output of \"{}\" still open after exit, not waiting", command);
                    break;
                }
            }
        }

        debug!(
            "Command \"{}\" finished with {:?}, {} bytes of output",
            command,
            status.code(),
            output.len()
        );

        if !status.success() {
            warn!("Command \"{}\" failed with {:?}", command, status.code());
            return Err(ReleaseError::CommandFailed {
                command,
                code: status.code(),
            });
        }

        Ok(CommandResult {
            output,
            code: status.code(),
        })
    }
}
