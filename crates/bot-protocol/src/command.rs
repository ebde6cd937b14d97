//! Outbound engine commands.

use std::fmt;
use std::time::Duration;

use bot_core::Clock;

use crate::wire::{BENCH, BEST_MOVE, GET_POSITION, GO, MAKE_MOVE, QUIT, SET_POSITION};

/// One command line for the engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Load a position from FEN; clears the engine's move list.
    SetPosition(String),

    /// Apply one move to the current position.
    MakeMove(String),

    /// Search with both clocks forwarded as-is; the engine budgets its
    /// own think time.
    Go(Clock),

    /// Search for a fixed think time. May answer with a draw claim.
    BestMove(Duration),

    /// Ask for the engine's current position as FEN.
    GetPosition,

    /// Fixed-depth search benchmark.
    BenchDepth(u32),

    Quit,
}

impl EngineCommand {
    /// The command line, without the trailing newline.
    pub fn encode(&self) -> String {
        match self {
            EngineCommand::SetPosition(fen) => format!("{} {}", SET_POSITION, fen),
            EngineCommand::MakeMove(mv) => format!("{} {}", MAKE_MOVE, mv),
            EngineCommand::Go(clock) => format!(
                "{} wtime {} btime {} winc {} binc {}",
                GO, clock.white_ms, clock.black_ms, clock.white_inc_ms, clock.black_inc_ms
            ),
            EngineCommand::BestMove(think) => {
                let ms = think.as_millis();
                format!("{} {}.{:03}", BEST_MOVE, ms / 1000, ms % 1000)
            }
            EngineCommand::GetPosition => GET_POSITION.to_string(),
            EngineCommand::BenchDepth(depth) => format!("{} depth {}", BENCH, depth),
            EngineCommand::Quit => QUIT.to_string(),
        }
    }

    /// Whether the engine acknowledges this command with `done`.
    pub fn expects_ack(&self) -> bool {
        matches!(
            self,
            EngineCommand::SetPosition(_) | EngineCommand::MakeMove(_) | EngineCommand::Quit
        )
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
