//! Server event payloads.
//!
//! Two NDJSON streams feed the bot:
//! - the account stream: [`IncomingEvent`] (`challenge`, `gameStart`,
//!   `gameFinish`, ...),
//! - one stream per game: [`GameEvent`] (`gameFull`, `gameState`,
//!   `chatLine`, `opponentGone`).
//!
//! Only the fields the bot consumes are modelled; everything else in
//! the records is ignored. Unknown `type` tags are preserved as
//! `Unknown(tag)` so callers can log them instead of failing.

use serde::Deserialize;
use serde_json::Value;

use crate::admission::Challenge;
use crate::clock::Clock;
use crate::color::Color;
use crate::fen::FenInfo;
use crate::history::MoveHistory;

// -----------------------------------------------------------------------------
// Account stream
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingEvent {
    Challenge(Challenge),
    GameStart(GameInfo),
    GameFinish(GameRef),
    ChallengeCanceled(ChallengeRef),
    ChallengeDeclined(ChallengeRef),
    Unknown(String),
}

/// Game summary carried by `gameStart`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game_id: String,
    pub color: Color,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub last_move: String,
    #[serde(default)]
    pub is_my_turn: bool,
    #[serde(default)]
    pub opponent: Option<Opponent>,
}

impl GameInfo {
    /// For a game already in progress, the server position plus its
    /// counters and the last move played. `None` for a fresh game or
    /// when the reported FEN cannot be read.
    pub fn resume_point(&self) -> Option<(&str, FenInfo, &str)> {
        if self.last_move.is_empty() {
            return None;
        }
        let fen = self.fen.as_deref()?;
        let info = FenInfo::parse(fen).ok()?;
        Some((fen, info, self.last_move.as_str()))
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent
            .as_ref()
            .and_then(|o| o.username.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Opponent {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
}

/// Game reference carried by `gameFinish`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    pub game_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeRef {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum KnownIncoming {
    Challenge { challenge: Challenge },
    GameStart { game: GameInfo },
    GameFinish { game: GameRef },
    ChallengeCanceled { challenge: ChallengeRef },
    ChallengeDeclined { challenge: ChallengeRef },
}

const INCOMING_TAGS: &[&str] = &[
    "challenge",
    "gameStart",
    "gameFinish",
    "challengeCanceled",
    "challengeDeclined",
];

impl IncomingEvent {
    /// Decode one NDJSON record of the account stream.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        let tag = type_tag(&value);

        if !INCOMING_TAGS.contains(&tag.as_str()) {
            return Ok(IncomingEvent::Unknown(tag));
        }

        Ok(match serde_json::from_value::<KnownIncoming>(value)? {
            KnownIncoming::Challenge { challenge } => IncomingEvent::Challenge(challenge),
            KnownIncoming::GameStart { game } => IncomingEvent::GameStart(game),
            KnownIncoming::GameFinish { game } => IncomingEvent::GameFinish(game),
            KnownIncoming::ChallengeCanceled { challenge } => {
                IncomingEvent::ChallengeCanceled(challenge)
            }
            KnownIncoming::ChallengeDeclined { challenge } => {
                IncomingEvent::ChallengeDeclined(challenge)
            }
        })
    }
}

// -----------------------------------------------------------------------------
// Per-game stream
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameFull(GameFull),
    GameState(GameState),
    ChatLine(ChatLine),
    OpponentGone(OpponentGone),
    Unknown(String),
}

/// First record of a game stream: players plus the current state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFull {
    pub id: String,
    #[serde(default)]
    pub white: Player,
    #[serde(default)]
    pub black: Player,
    #[serde(default)]
    pub initial_fen: Option<String>,
    pub state: GameState,
}

impl GameFull {
    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ai_level: Option<u8>,
}

impl Player {
    pub fn display_name(&self) -> String {
        match (&self.name, &self.id, self.ai_level) {
            (Some(name), _, _) => name.clone(),
            (None, Some(id), _) => id.clone(),
            (None, None, Some(level)) => format!("AI level {}", level),
            (None, None, None) => "unknown".to_string(),
        }
    }
}

/// Authoritative game state: full move list, clocks and status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub moves: String,
    #[serde(default)]
    pub wtime: u64,
    #[serde(default)]
    pub btime: u64,
    #[serde(default)]
    pub winc: u64,
    #[serde(default)]
    pub binc: u64,
    pub status: String,
}

impl GameState {
    pub fn history(&self) -> MoveHistory {
        MoveHistory::parse(&self.moves)
    }

    pub fn clock(&self) -> Clock {
        Clock {
            white_ms: self.wtime,
            black_ms: self.btime,
            white_inc_ms: self.winc,
            black_inc_ms: self.binc,
        }
    }

    /// The game is still being played.
    pub fn is_started(&self) -> bool {
        self.status == "started"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatLine {
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentGone {
    #[serde(default)]
    pub gone: bool,
    #[serde(default)]
    pub claim_win_in_seconds: Option<u64>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum KnownGame {
    GameFull(GameFull),
    GameState(GameState),
    ChatLine(ChatLine),
    OpponentGone(OpponentGone),
}

const GAME_TAGS: &[&str] = &["gameFull", "gameState", "chatLine", "opponentGone"];

impl GameEvent {
    /// Decode one NDJSON record of a game stream.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        let tag = type_tag(&value);

        if !GAME_TAGS.contains(&tag.as_str()) {
            return Ok(GameEvent::Unknown(tag));
        }

        Ok(match serde_json::from_value::<KnownGame>(value)? {
            KnownGame::GameFull(full) => GameEvent::GameFull(full),
            KnownGame::GameState(state) => GameEvent::GameState(state),
            KnownGame::ChatLine(chat) => GameEvent::ChatLine(chat),
            KnownGame::OpponentGone(gone) => GameEvent::OpponentGone(gone),
        })
    }
}

fn type_tag(value: &Value) -> String {
    value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
