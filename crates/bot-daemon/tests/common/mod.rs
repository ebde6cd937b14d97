// crates/bot-daemon/tests/common/mod.rs
//
// In-memory stand-ins for the engine channel and the game server.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use bot_core::{Color, DeclineReason, GameEvent, GameInfo, GameState, IncomingEvent, START_FEN};
use bot_daemon::engine_io::{EngineError, EngineIo, EngineLauncher};
use bot_daemon::server::{EventStream, GameServer, ServerError};

// -----------------------------------------------------------------------------
// Engine
// -----------------------------------------------------------------------------

/// What a scripted engine saw, shared with the test.
#[derive(Clone, Default)]
pub struct EngineLog {
    sent: Arc<Mutex<Vec<String>>>,
    terminated: Arc<AtomicBool>,
}

impl EngineLog {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Sent lines starting with `prefix`.
    pub fn sent_with(&self, prefix: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|l| l.starts_with(prefix))
            .collect()
    }

    pub fn terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

/// Engine that answers every command from a script.
///
/// `setPosition`, `makeMove` and `quit` are acknowledged; `getPosition`
/// returns the last position set; `go` pops the next reply from the
/// queue, or plays `e2e4` when it is empty.
pub struct ScriptedEngine {
    log: EngineLog,
    pending: VecDeque<String>,
    search_replies: VecDeque<Vec<String>>,
    position: String,
}

impl ScriptedEngine {
    pub fn new() -> (Self, EngineLog) {
        let log = EngineLog::default();
        let engine = ScriptedEngine {
            log: log.clone(),
            pending: VecDeque::new(),
            search_replies: VecDeque::new(),
            position: START_FEN.to_string(),
        };
        (engine, log)
    }

    /// Queue the response lines of the next `go`.
    pub fn reply_to_search(mut self, lines: &[&str]) -> Self {
        self.search_replies
            .push_back(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Queue a two-line `go` reply playing `mv`.
    pub fn play(self, mv: &str) -> Self {
        let best = format!("bestmove {}", mv);
        self.reply_to_search(&["info (depth: 1)", &best])
    }
}

#[async_trait]
impl EngineIo for ScriptedEngine {
    async fn send_line(&mut self, line: &str) -> Result<(), EngineError> {
        self.log.sent.lock().unwrap().push(line.to_string());

        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
        match keyword {
            "setPosition" => {
                self.position = rest.to_string();
                self.pending.push_back("done".to_string());
            }
            "makeMove" | "quit" => self.pending.push_back("done".to_string()),
            "getPosition" => self.pending.push_back(self.position.clone()),
            "go" | "bestMove" => {
                let reply = self
                    .search_replies
                    .pop_front()
                    .unwrap_or_else(|| vec!["info (mock)".into(), "bestmove e2e4".into()]);
                self.pending.extend(reply);
            }
            _ => self
                .pending
                .push_back(format!("'{}' is not a valid command", line)),
        }
        Ok(())
    }

    async fn receive_line(&mut self) -> Result<String, EngineError> {
        self.pending.pop_front().ok_or(EngineError::Died)
    }

    async fn terminate(&mut self) {
        self.log.terminated.store(true, Ordering::SeqCst);
    }
}

/// Hands out scripted engines and remembers their logs per game.
#[derive(Default)]
pub struct ScriptedLauncher {
    logs: Mutex<HashMap<String, EngineLog>>,
    launches: AtomicUsize,
}

impl ScriptedLauncher {
    pub fn log(&self, game_id: &str) -> Option<EngineLog> {
        self.logs.lock().unwrap().get(game_id).cloned()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineLauncher for ScriptedLauncher {
    async fn launch(&self, game_id: &str) -> Result<Box<dyn EngineIo>, EngineError> {
        let (engine, log) = ScriptedEngine::new();
        self.logs.lock().unwrap().insert(game_id.to_string(), log);
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(engine))
    }

    fn command_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}

// -----------------------------------------------------------------------------
// Server
// -----------------------------------------------------------------------------

/// Game server backed by canned streams. Games without canned events
/// get a stream that never ends.
#[derive(Default)]
pub struct MemoryServer {
    incoming: Mutex<Vec<IncomingEvent>>,
    games: Mutex<HashMap<String, Vec<GameEvent>>>,
    pub reject_moves: AtomicBool,
    pub accepted: Mutex<Vec<String>>,
    pub declined: Mutex<Vec<(String, DeclineReason)>>,
    pub moves: Mutex<Vec<(String, String)>>,
    pub chats: Mutex<Vec<(String, String)>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        MemoryServer::default()
    }

    pub fn with_incoming(self, events: Vec<IncomingEvent>) -> Self {
        *self.incoming.lock().unwrap() = events;
        self
    }

    pub fn with_game(self, game_id: &str, events: Vec<GameEvent>) -> Self {
        self.games
            .lock()
            .unwrap()
            .insert(game_id.to_string(), events);
        self
    }

    pub fn rejecting_moves(self) -> Self {
        self.reject_moves.store(true, Ordering::SeqCst);
        self
    }

    pub fn moves_played(&self) -> Vec<String> {
        self.moves
            .lock()
            .unwrap()
            .iter()
            .map(|(_, mv)| mv.clone())
            .collect()
    }
}

#[async_trait]
impl GameServer for MemoryServer {
    async fn incoming_events(&self) -> Result<EventStream<IncomingEvent>, ServerError> {
        let events = std::mem::take(&mut *self.incoming.lock().unwrap());
        Ok(stream::iter(events.into_iter().map(Ok)).boxed())
    }

    async fn game_events(&self, game_id: &str) -> Result<EventStream<GameEvent>, ServerError> {
        match self.games.lock().unwrap().remove(game_id) {
            Some(events) => Ok(stream::iter(events.into_iter().map(Ok)).boxed()),
            None => Ok(stream::pending::<Result<GameEvent, ServerError>>().boxed()),
        }
    }

    async fn accept_challenge(&self, challenge_id: &str) -> Result<(), ServerError> {
        self.accepted.lock().unwrap().push(challenge_id.to_string());
        Ok(())
    }

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: DeclineReason,
    ) -> Result<(), ServerError> {
        self.declined
            .lock()
            .unwrap()
            .push((challenge_id.to_string(), reason));
        Ok(())
    }

    async fn make_move(&self, game_id: &str, mv: &str) -> Result<(), ServerError> {
        if self.reject_moves.load(Ordering::SeqCst) {
            return Err(ServerError::Refused(format!("illegal move {}", mv)));
        }
        self.moves
            .lock()
            .unwrap()
            .push((game_id.to_string(), mv.to_string()));
        Ok(())
    }

    async fn post_chat(&self, game_id: &str, text: &str) -> Result<(), ServerError> {
        self.chats
            .lock()
            .unwrap()
            .push((game_id.to_string(), text.to_string()));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Payload builders
// -----------------------------------------------------------------------------

pub fn new_game(game_id: &str, color: Color) -> GameInfo {
    GameInfo {
        game_id: game_id.to_string(),
        color,
        fen: Some(START_FEN.to_string()),
        last_move: String::new(),
        is_my_turn: color == Color::White,
        opponent: None,
    }
}

pub fn resumed_game(game_id: &str, color: Color, fen: &str, last_move: &str) -> GameInfo {
    GameInfo {
        game_id: game_id.to_string(),
        color,
        fen: Some(fen.to_string()),
        last_move: last_move.to_string(),
        is_my_turn: true,
        opponent: None,
    }
}

pub fn state(moves: &str) -> GameState {
    GameState {
        moves: moves.to_string(),
        wtime: 60_000,
        btime: 60_000,
        winc: 1_000,
        binc: 1_000,
        status: "started".to_string(),
    }
}

pub fn finished(moves: &str, status: &str) -> GameState {
    GameState {
        status: status.to_string(),
        ..state(moves)
    }
}
