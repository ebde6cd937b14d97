//! Engine channel backed by a child process.
//!
//! The process is started with piped stdin/stdout/stderr:
//! - stdin carries one command per line,
//! - stdout carries the responses,
//! - stderr is forwarded to the log by a background reader.
//!
//! The child is spawned with kill-on-drop, so a session task that is
//! aborted or panics never leaves an engine behind.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use bot_protocol::EngineCommand;

use crate::config::EngineConfig;
use crate::engine_io::{EngineError, EngineIo, EngineLauncher};

/// How long `terminate` waits for a clean exit after `quit`.
const QUIT_GRACE: Duration = Duration::from_millis(500);

pub struct EngineProcess {
    game_id: String,
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    terminated: bool,
}

impl EngineProcess {
    /// Spawn the engine described by `config` for `game_id`.
    pub fn start(game_id: &str, config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.path)
            .args(config.launch_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: config.path.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;

        if let Some(stderr) = child.stderr.take() {
            let game_id = game_id.to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(game_id = %game_id, "engine stderr: {}", line);
                }
            });
        }

        debug!(
            game_id = %game_id,
            path = %config.path.display(),
            pid = ?child.id(),
            "engine started"
        );

        Ok(EngineProcess {
            game_id: game_id.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            terminated: false,
        })
    }
}

#[async_trait]
impl EngineIo for EngineProcess {
    async fn send_line(&mut self, line: &str) -> Result<(), EngineError> {
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn receive_line(&mut self) -> Result<String, EngineError> {
        match self.stdout.next_line().await? {
            Some(line) => Ok(line.trim_end_matches('\r').to_string()),
            None => Err(EngineError::Died),
        }
    }

    async fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        // Best effort: the process may already be gone.
        let _ = self.send_line(&EngineCommand::Quit.encode()).await;

        match tokio::time::timeout(QUIT_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => debug!(game_id = %self.game_id, %status, "engine exited"),
            Ok(Err(e)) => warn!(game_id = %self.game_id, "waiting for engine failed: {}", e),
            Err(_) => {
                warn!(game_id = %self.game_id, "engine ignored quit; killing it");
                if let Err(e) = self.child.kill().await {
                    warn!(game_id = %self.game_id, "failed to kill engine: {}", e);
                }
            }
        }
    }
}

/// Launches one [`EngineProcess`] per game from a shared config.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    config: EngineConfig,
}

impl ProcessLauncher {
    pub fn new(config: EngineConfig) -> Self {
        ProcessLauncher { config }
    }
}

#[async_trait]
impl EngineLauncher for ProcessLauncher {
    async fn launch(&self, game_id: &str) -> Result<Box<dyn EngineIo>, EngineError> {
        let process = EngineProcess::start(game_id, &self.config)?;
        Ok(Box::new(process))
    }

    fn command_timeout(&self) -> Duration {
        self.config.command_timeout
    }
}

fn missing_pipe(name: &str) -> EngineError {
    EngineError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        format!("engine {} was not captured", name),
    ))
}
