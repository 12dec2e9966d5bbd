use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineOutput, EngineRequest};
use crate::error::{ProcessingError, Result};

/// Runs requests through the `ffmpeg` command-line tool
///
/// Each call spawns one child process and waits for it to exit. A call that
/// exceeds the timeout is abandoned and the child is killed.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    program: String,
    timeout: Duration,
}

impl FfmpegEngine {
    pub fn new<S: Into<String>>(program: S, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.program.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that the program can be started at all
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl Engine for FfmpegEngine {
    async fn invoke(&self, request: &EngineRequest) -> Result<EngineOutput> {
        let args = request.to_args();
        debug!("{} command: {} {}", request.stage, self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessingError::SpawnFailed {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        // Dropping the pending wait on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ProcessingError::SpawnFailed {
                program: self.program.clone(),
                reason: format!("waiting for process failed: {}", e),
            })?,
            Err(_) => {
                warn!("{} exceeded {:?}, killing {}", request.stage, self.timeout, self.program);
                return Err(ProcessingError::TimedOut {
                    stage: request.stage,
                    seconds: self.timeout.as_secs(),
                }
                .into());
            }
        };

        let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!("{} exited with {:?}", request.stage, output.status.code());

        Ok(EngineOutput {
            exit_code: output.status.code(),
            diagnostics,
        })
    }
}
