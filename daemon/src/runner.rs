//! Analysis subprocess runner
//!
//! Launches `<program> <args...> <date> <layer>` and collects its stdout.
//! Output is buffered chunk by chunk and only split into lines once the
//! process is done. One process per command; nothing is shared between runs.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, error, info, trace, warn};

use viirsbot_core::{split_output, CommandError, NormalizedQuery, SubprocessOutcome};

use crate::config::AnalysisConfig;

const READ_CHUNK: usize = 4096;

/// Launches the external analysis program.
#[derive(Debug, Clone)]
pub struct AnalysisRunner {
    program: String,
    base_args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl AnalysisRunner {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
            working_dir: None,
            timeout: None,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            program: config.program.clone(),
            base_args: config.args.clone(),
            working_dir: config.working_dir.clone(),
            timeout: config.timeout(),
        }
    }

    /// Kill the process if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run the analysis for `query`. Never panics and never retries.
    pub async fn run(&self, query: &NormalizedQuery) -> SubprocessOutcome {
        match self.collect(query).await {
            Ok(stdout_lines) => {
                debug!(lines = stdout_lines.len(), "Analysis output collected");
                SubprocessOutcome::Success { stdout_lines }
            }
            Err(e) => {
                error!(
                    program = %self.program,
                    date = %query.date,
                    layer = %query.layer_arg(),
                    "Analysis run failed: {}",
                    e
                );
                SubprocessOutcome::Failure {
                    cause: e.to_string(),
                }
            }
        }
    }

    async fn collect(&self, query: &NormalizedQuery) -> Result<Vec<String>, CommandError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .arg(&query.date)
            .arg(query.layer_arg())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(CommandError::Spawn)?;
        info!(
            pid = ?child.id(),
            program = %self.program,
            date = %query.date,
            layer = %query.layer_arg(),
            "Analysis process started"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut text).await;
            }
            text
        });

        let read = async {
            let mut buffer = Vec::new();
            if let Some(mut stdout) = stdout {
                let mut chunk = [0u8; READ_CHUNK];
                loop {
                    let n = stdout.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    trace!(bytes = n, "Analysis stdout chunk");
                    buffer.extend_from_slice(&chunk[..n]);
                }
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((buffer, status))
        };

        let finished = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.ok(),
            None => Some(read.await),
        };
        let (buffer, status) = match finished {
            Some(result) => result?,
            None => {
                let limit = self.timeout.unwrap_or_default();
                warn!(timeout = ?limit, "Analysis timed out, killing it");
                let _ = child.start_kill();
                return Err(CommandError::Timeout { limit });
            }
        };

        let stderr = stderr_task.await.unwrap_or_default();
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Analysis stderr");
        }
        if !status.success() {
            warn!(exit_code = ?status.code(), "Analysis exited unsuccessfully");
        }

        Ok(split_output(&String::from_utf8_lossy(&buffer)))
    }
}
