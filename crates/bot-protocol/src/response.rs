//! Inbound response grammars.
//!
//! Every parser is strict: a line either matches its grammar exactly
//! and yields a typed value, or it yields a [`ProtocolError`] carrying
//! the raw text. There is no best-effort fallback.

use bot_core::{FenInfo, MoveToken};

use crate::error::ProtocolError;
use crate::wire::{
    BENCH_PREFIX, BESTMOVE_PREFIX, DONE, DRAW_BY_FIFTY_MOVES, ILLEGAL_MOVE_SUFFIX,
    INFO_PREFIX, INVALID_COMMAND_SUFFIX,
};

/// Outcome of a move search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReply {
    /// The engine picked a move. `info` is the engine's diagnostic text
    /// (evaluation, depth, ...) and is not interpreted.
    Move { mv: MoveToken, info: String },

    /// The engine claims a fifty-move draw instead of moving. The
    /// caller must confirm the claim on its own.
    DrawClaim,
}

/// One line of a search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchLine {
    /// `info (<text>)`: must be followed by `bestmove <move>`.
    Info(String),

    /// A complete reply.
    Reply(SearchReply),
}

/// Result of `bench depth <n>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchResult {
    pub nodes: u64,
    pub seconds: f64,
    pub depth: u32,
}

/// Validate the `done` acknowledgement.
pub fn parse_ack(line: &str) -> Result<(), ProtocolError> {
    if line == DONE {
        Ok(())
    } else {
        Err(rejection_or_unparsed(line))
    }
}

/// Parse the first (possibly only) line of a search response.
///
/// Accepts `<move> (<info>)`, `info (<info>)`, `bestmove <move>` and
/// the draw sentinel.
pub fn parse_search_line(line: &str) -> Result<SearchLine, ProtocolError> {
    if line == DRAW_BY_FIFTY_MOVES {
        return Ok(SearchLine::Reply(SearchReply::DrawClaim));
    }

    if let Some(rest) = line.strip_prefix(INFO_PREFIX) {
        return parenthesised(rest)
            .map(|info| SearchLine::Info(info.to_string()))
            .ok_or_else(|| ProtocolError::unparsed(line));
    }

    if line.starts_with(BESTMOVE_PREFIX) {
        return finish_search(String::new(), line).map(SearchLine::Reply);
    }

    if let Some((mv, rest)) = line.split_once(' ') {
        if let (Some(mv), Some(info)) = (MoveToken::parse(mv), parenthesised(rest)) {
            return Ok(SearchLine::Reply(SearchReply::Move {
                mv,
                info: info.to_string(),
            }));
        }
    }

    Err(rejection_or_unparsed(line))
}

/// Parse the `bestmove <move>` line that follows an `info` line.
pub fn finish_search(info: String, line: &str) -> Result<SearchReply, ProtocolError> {
    line.strip_prefix(BESTMOVE_PREFIX)
        .and_then(MoveToken::parse)
        .map(|mv| SearchReply::Move { mv, info })
        .ok_or_else(|| rejection_or_unparsed(line))
}

/// Validate a `getPosition` reply as a six-field FEN.
pub fn parse_position(line: &str) -> Result<String, ProtocolError> {
    FenInfo::parse(line)
        .map(|_| line.to_string())
        .map_err(|_| rejection_or_unparsed(line))
}

/// Parse `Bench result: <nodes> nodes in <seconds> seconds (depth: <d>)`.
pub fn parse_bench(line: &str) -> Result<BenchResult, ProtocolError> {
    bench_fields(line).ok_or_else(|| rejection_or_unparsed(line))
}

fn bench_fields(line: &str) -> Option<BenchResult> {
    let rest = line.strip_prefix(BENCH_PREFIX)?;
    let (nodes, rest) = rest.split_once(" nodes in ")?;
    let (seconds, rest) = rest.split_once(" seconds (depth: ")?;
    let depth = rest.strip_suffix(')')?;

    let seconds = seconds.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0)?;

    Some(BenchResult {
        nodes: nodes.parse().ok()?,
        seconds,
        depth: depth.parse().ok()?,
    })
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn parenthesised(s: &str) -> Option<&str> {
    s.strip_prefix('(')?.strip_suffix(')')
}

fn quoted_before<'a>(line: &'a str, suffix: &str) -> Option<&'a str> {
    line.strip_prefix('\'')?.strip_suffix(suffix)
}

/// Map the engine's explicit rejections to typed errors; anything else
/// is an unparsed response.
fn rejection_or_unparsed(line: &str) -> ProtocolError {
    if let Some(mv) = quoted_before(line, ILLEGAL_MOVE_SUFFIX) {
        return ProtocolError::IllegalMove {
            mv: mv.to_string(),
            raw: line.to_string(),
        };
    }

    if let Some(command) = quoted_before(line, INVALID_COMMAND_SUFFIX) {
        return ProtocolError::UnknownCommand {
            command: command.to_string(),
            raw: line.to_string(),
        };
    }

    ProtocolError::unparsed(line)
}
