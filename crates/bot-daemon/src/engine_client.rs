//! Typed request/response calls on top of an engine channel.
//!
//! Every call sends one command and consumes its full response before
//! returning, so at most one command is ever outstanding. Each round
//! trip is bounded: non-search commands by the command timeout, a
//! search by the mover's remaining clock plus the command timeout.

use std::time::Duration;

use tracing::debug;

use bot_core::{Clock, Color};
use bot_protocol::{
    finish_search, parse_ack, parse_bench, parse_position, parse_search_line, BenchResult,
    EngineCommand, SearchLine, SearchReply,
};

use crate::engine_io::{EngineError, EngineIo};

pub struct EngineClient {
    io: Box<dyn EngineIo>,
    command_timeout: Duration,
}

impl EngineClient {
    pub fn new(io: Box<dyn EngineIo>, command_timeout: Duration) -> Self {
        EngineClient {
            io,
            command_timeout,
        }
    }

    /// Load `fen` as the engine's current position.
    pub async fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.acknowledged(EngineCommand::SetPosition(fen.to_string()))
            .await
    }

    /// Apply one move to the engine's position.
    pub async fn make_move(&mut self, mv: &str) -> Result<(), EngineError> {
        self.acknowledged(EngineCommand::MakeMove(mv.to_string()))
            .await
    }

    /// Search with both clocks forwarded unmodified. `mover` is the
    /// side to move; its remaining time bounds the wait.
    pub async fn go(&mut self, clock: Clock, mover: Color) -> Result<SearchReply, EngineError> {
        let limit = Duration::from_millis(clock.remaining_ms(mover)) + self.command_timeout;
        self.search(EngineCommand::Go(clock), limit).await
    }

    /// Search for a fixed think time.
    pub async fn best_move(&mut self, think: Duration) -> Result<SearchReply, EngineError> {
        let limit = think + self.command_timeout;
        self.search(EngineCommand::BestMove(think), limit).await
    }

    /// The engine's current position as FEN.
    pub async fn position(&mut self) -> Result<String, EngineError> {
        let command = EngineCommand::GetPosition;
        self.send(&command).await?;
        let line = self.receive(&command, self.command_timeout).await?;
        Ok(parse_position(&line)?)
    }

    /// Run a fixed-depth benchmark. Unbounded depth means unbounded
    /// time, so the wait is not limited by the command timeout.
    pub async fn bench_depth(&mut self, depth: u32) -> Result<BenchResult, EngineError> {
        let command = EngineCommand::BenchDepth(depth);
        self.send(&command).await?;
        let line = self.receive(&command, Duration::MAX).await?;
        Ok(parse_bench(&line)?)
    }

    /// Stop the engine process.
    pub async fn terminate(&mut self) {
        self.io.terminate().await;
    }

    // -------------------------------------------------------------------------
    // Round trips
    // -------------------------------------------------------------------------

    async fn acknowledged(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        self.send(&command).await?;
        let line = self.receive(&command, self.command_timeout).await?;
        Ok(parse_ack(&line)?)
    }

    async fn search(
        &mut self,
        command: EngineCommand,
        limit: Duration,
    ) -> Result<SearchReply, EngineError> {
        self.send(&command).await?;
        let first = self.receive(&command, limit).await?;

        match parse_search_line(&first)? {
            SearchLine::Reply(reply) => Ok(reply),
            SearchLine::Info(info) => {
                let second = self.receive(&command, self.command_timeout).await?;
                Ok(finish_search(info, &second)?)
            }
        }
    }

    async fn send(&mut self, command: &EngineCommand) -> Result<(), EngineError> {
        let line = command.encode();
        debug!(command = %line, "-> engine");
        self.io.send_line(&line).await
    }

    async fn receive(
        &mut self,
        command: &EngineCommand,
        limit: Duration,
    ) -> Result<String, EngineError> {
        let line = if limit == Duration::MAX {
            self.io.receive_line().await?
        } else {
            tokio::time::timeout(limit, self.io.receive_line())
                .await
                .map_err(|_| EngineError::Timeout {
                    command: command.encode(),
                    after: limit,
                })??
        };
        debug!(response = %line, "<- engine");
        Ok(line)
    }
}
