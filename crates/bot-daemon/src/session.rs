//! One game, one engine.
//!
//! A [`GameSession`] owns the engine channel of a single game and keeps
//! the engine's move list equal to the server's:
//!
//! ```text
//! Initializing -> Syncing -> AwaitingEvent
//!     -> (OurTurn -> Thinking -> Submitting -> AwaitingEvent)* -> Finished
//! ```
//!
//! Every game state (including the one embedded in `gameFull`) goes
//! through [`GameSession::sync`]; the engine is asked for a move only
//! when the synced move count says it is our turn. [`run_session`]
//! wraps the whole lifetime and terminates the engine on every exit
//! path.

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use bot_core::{
    is_our_turn, plan_sync, AppliedCursor, Clock, Color, FiftyMoveWitness, GameEvent, GameInfo,
    GameState, MoveHistory, SyncPlan, START_FEN,
};
use bot_protocol::SearchReply;

use crate::engine_client::EngineClient;
use crate::engine_io::{EngineError, EngineLauncher};
use crate::server::{GameServer, ServerError};

/// Session lifecycle states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Syncing,
    AwaitingEvent,
    OurTurn,
    Thinking,
    Submitting,
    Finished,
}

/// Why a session ended normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The server reported a status other than `started`.
    ServerStatus(String),
    /// The engine claimed a fifty-move draw and the claim checked out.
    FiftyMoveDraw,
    /// The game stream ended.
    StreamClosed,
}

/// Why a session ended abnormally. Local to the session: never
/// propagated to the dispatcher or other games.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("game stream failed")]
    Stream(#[source] ServerError),

    #[error("server rejected move {mv}")]
    Submission {
        mv: String,
        engine_position: Option<String>,
        #[source]
        source: ServerError,
    },

    #[error("engine claimed a fifty-move draw at ply {ply}, but the halfmove clock is at most {clock_bound}")]
    DrawClaimInconsistency { ply: usize, clock_bound: u32 },
}

/// Per-session settings shared by all games.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    /// Chat lines posted when a new game starts.
    pub greeting: Vec<String>,
}

pub struct GameSession {
    game_id: String,
    color: Color,
    cursor: AppliedCursor,
    witness: FiftyMoveWitness,
    state: SessionState,
    engine: EngineClient,
    server: Arc<dyn GameServer>,
}

impl GameSession {
    pub fn new(
        game_id: impl Into<String>,
        color: Color,
        engine: EngineClient,
        server: Arc<dyn GameServer>,
    ) -> Self {
        GameSession {
            game_id: game_id.into(),
            color,
            cursor: AppliedCursor::start(),
            witness: FiftyMoveWitness::from_start(),
            state: SessionState::Initializing,
            engine,
            server,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Half-moves the engine has applied.
    pub fn applied_ply(&self) -> usize {
        self.cursor.ply()
    }

    /// Put the engine on the game's current position: the server's
    /// position for a resumed game, the starting position otherwise.
    /// Returns whether the game was resumed.
    pub async fn initialize(&mut self, start: &GameInfo) -> Result<bool, SessionError> {
        self.state = SessionState::Initializing;

        match start.resume_point() {
            Some((fen, fen_info, last_move)) => {
                info!(
                    game_id = %self.game_id,
                    ply = fen_info.ply(),
                    last_move,
                    "resuming game from server position"
                );
                self.engine.set_position(fen).await?;
                self.cursor = AppliedCursor::resumed(fen_info.ply(), last_move);
                self.witness =
                    FiftyMoveWitness::from_position(fen_info.halfmove_clock, fen_info.ply());
                Ok(true)
            }
            None => {
                if !start.last_move.is_empty() {
                    warn!(
                        game_id = %self.game_id,
                        fen = ?start.fen,
                        "unreadable resume position; starting from the initial position"
                    );
                }
                self.engine.set_position(START_FEN).await?;
                self.cursor = AppliedCursor::start();
                self.witness = FiftyMoveWitness::from_start();
                Ok(false)
            }
        }
    }

    /// Bring the engine's move list in line with `history`.
    pub async fn sync(&mut self, history: &MoveHistory) -> Result<(), SessionError> {
        self.state = SessionState::Syncing;

        let plan = plan_sync(&self.cursor, history);
        if let SyncPlan::Replay(moves) = plan {
            warn!(
                game_id = %self.game_id,
                applied = self.cursor.ply(),
                last_move = ?self.cursor.last_move(),
                server = moves.len(),
                "engine history diverged from server; replaying from the start"
            );
            self.engine.set_position(START_FEN).await?;
            self.witness = FiftyMoveWitness::from_start();
        }

        for mv in plan.moves() {
            self.engine.make_move(mv).await?;
        }
        self.cursor.advance_to(history);
        Ok(())
    }

    /// Handle one game state. Returns an outcome when the game is over
    /// for this session.
    pub async fn on_game_state(
        &mut self,
        game_state: &GameState,
    ) -> Result<Option<SessionOutcome>, SessionError> {
        if !game_state.is_started() {
            return Ok(Some(SessionOutcome::ServerStatus(game_state.status.clone())));
        }

        let history = game_state.history();
        self.sync(&history).await?;

        if !is_our_turn(history.len(), self.color) {
            self.state = SessionState::AwaitingEvent;
            return Ok(None);
        }

        self.state = SessionState::OurTurn;
        self.take_turn(game_state.clock()).await
    }

    /// Consume the game stream until the game ends for this session.
    pub async fn play(
        &mut self,
        start: &GameInfo,
        settings: &SessionSettings,
    ) -> Result<SessionOutcome, SessionError> {
        let resumed = self.initialize(start).await?;
        if !resumed {
            self.greet(&settings.greeting).await;
        }

        let mut events = self
            .server
            .game_events(&self.game_id)
            .await
            .map_err(SessionError::Stream)?;
        self.state = SessionState::AwaitingEvent;

        while let Some(event) = events.next().await {
            let outcome = match event.map_err(SessionError::Stream)? {
                GameEvent::GameFull(full) => {
                    info!(
                        game_id = %self.game_id,
                        color = %self.color,
                        opponent = %full.player(self.color.opposite()).display_name(),
                        "game started"
                    );
                    self.on_game_state(&full.state).await?
                }
                GameEvent::GameState(game_state) => self.on_game_state(&game_state).await?,
                GameEvent::ChatLine(chat) => {
                    debug!(game_id = %self.game_id, room = %chat.room, user = %chat.username, "chat: {}", chat.text);
                    None
                }
                GameEvent::OpponentGone(gone) => {
                    info!(
                        game_id = %self.game_id,
                        gone = gone.gone,
                        claim_win_in = ?gone.claim_win_in_seconds,
                        "opponent left"
                    );
                    None
                }
                GameEvent::Unknown(kind) => {
                    warn!(game_id = %self.game_id, "unknown game event type {:?}", kind);
                    None
                }
            };

            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }

        Ok(SessionOutcome::StreamClosed)
    }

    async fn take_turn(&mut self, clock: Clock) -> Result<Option<SessionOutcome>, SessionError> {
        self.state = SessionState::Thinking;

        match self.engine.go(clock, self.color).await? {
            SearchReply::DrawClaim => {
                let ply = self.cursor.ply();
                if self.witness.claim_plausible(ply) {
                    info!(game_id = %self.game_id, ply, "engine claims fifty-move draw");
                    Ok(Some(SessionOutcome::FiftyMoveDraw))
                } else {
                    Err(SessionError::DrawClaimInconsistency {
                        ply,
                        clock_bound: self.witness.clock_upper_bound(ply),
                    })
                }
            }
            SearchReply::Move { mv, info } => {
                self.state = SessionState::Submitting;
                info!(game_id = %self.game_id, mv = %mv, "playing move ({})", info);

                if let Err(source) = self.server.make_move(&self.game_id, mv.as_str()).await {
                    let engine_position = self.engine.position().await.ok();
                    error!(
                        game_id = %self.game_id,
                        mv = %mv,
                        engine_position = ?engine_position,
                        "move submission failed: {}",
                        source
                    );
                    return Err(SessionError::Submission {
                        mv: mv.into_string(),
                        engine_position,
                        source,
                    });
                }

                self.state = SessionState::AwaitingEvent;
                Ok(None)
            }
        }
    }

    async fn greet(&mut self, lines: &[String]) {
        for line in lines {
            if let Err(e) = self.server.post_chat(&self.game_id, line).await {
                warn!(game_id = %self.game_id, "failed to post greeting: {}", e);
                return;
            }
        }
    }

    /// Terminate the engine and mark the session finished.
    pub async fn finish(&mut self) {
        self.engine.terminate().await;
        self.state = SessionState::Finished;
    }
}

/// Run one game from start to finish.
///
/// The engine is launched here and terminated here, whatever way the
/// game ends.
pub async fn run_session(
    start: GameInfo,
    server: Arc<dyn GameServer>,
    launcher: Arc<dyn EngineLauncher>,
    settings: Arc<SessionSettings>,
) -> Result<SessionOutcome, SessionError> {
    let io = launcher.launch(&start.game_id).await?;
    let engine = EngineClient::new(io, launcher.command_timeout());
    let mut session = GameSession::new(start.game_id.clone(), start.color, engine, server);

    let result = session.play(&start, &settings).await;
    session.finish().await;
    result
}
