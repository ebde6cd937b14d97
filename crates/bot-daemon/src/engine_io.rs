//! The engine process channel abstraction.
//!
//! A session talks to its engine through [`EngineIo`]: one line out,
//! one line in, strictly alternating. [`EngineLauncher`] creates one
//! channel per game; channels are never shared.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use bot_protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The executable could not be started.
    #[error("failed to spawn engine {path}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// End of stream on the engine's stdout: the process is gone.
    #[error("engine process died")]
    Died,

    #[error("engine i/o error")]
    Io(#[from] std::io::Error),

    /// No response within the round-trip bound.
    #[error("engine did not answer {command:?} within {after:?}")]
    Timeout { command: String, after: Duration },

    /// The response did not match the expected grammar.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// One engine process, spoken to a line at a time.
#[async_trait]
pub trait EngineIo: Send {
    /// Write one command line and flush it.
    async fn send_line(&mut self, line: &str) -> Result<(), EngineError>;

    /// Wait for the next full response line.
    async fn receive_line(&mut self) -> Result<String, EngineError>;

    /// Stop the engine. Must be safe to call more than once.
    async fn terminate(&mut self);
}

/// Starts one engine channel per game.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(&self, game_id: &str) -> Result<Box<dyn EngineIo>, EngineError>;

    /// Bound on one non-search round trip.
    fn command_timeout(&self) -> Duration;
}
