//! Central event loop.
//!
//! The dispatcher consumes the account event stream and:
//! - answers challenges through the admission policy,
//! - starts one session task per admitted `gameStart`,
//! - releases a concurrency slot on `gameFinish`.
//!
//! Sessions run in a `JoinSet` owned by the dispatcher; finished ones
//! are reaped and their outcome logged. The concurrency counter is the
//! only state the dispatcher shares.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use bot_core::{admit, Admission, Challenge, ConcurrencyCounter, GameInfo, GameRef, IncomingEvent};

use crate::engine_io::EngineLauncher;
use crate::server::{GameServer, ServerError};
use crate::session::{run_session, SessionError, SessionOutcome, SessionSettings};

type SessionResult = (String, Result<SessionOutcome, SessionError>);

pub struct Dispatcher {
    server: Arc<dyn GameServer>,
    launcher: Arc<dyn EngineLauncher>,
    settings: Arc<SessionSettings>,
    counter: Arc<ConcurrencyCounter>,
    /// Games this dispatcher started and has not seen finish.
    active: HashSet<String>,
    sessions: JoinSet<SessionResult>,
}

impl Dispatcher {
    pub fn new(
        server: Arc<dyn GameServer>,
        launcher: Arc<dyn EngineLauncher>,
        settings: SessionSettings,
        max_games: usize,
    ) -> Self {
        Dispatcher {
            server,
            launcher,
            settings: Arc::new(settings),
            counter: Arc::new(ConcurrencyCounter::new(max_games)),
            active: HashSet::new(),
            sessions: JoinSet::new(),
        }
    }

    pub fn counter(&self) -> Arc<ConcurrencyCounter> {
        Arc::clone(&self.counter)
    }

    pub fn is_active(&self, game_id: &str) -> bool {
        self.active.contains(game_id)
    }

    /// Number of session tasks not yet reaped.
    pub fn running_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Run until the account stream ends, then wait for the running
    /// sessions.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let mut events = self.server.incoming_events().await?;
        info!(max_games = self.counter.max(), "listening for events");

        let mut stream_error = None;
        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event).await,
                    Some(Err(e)) => {
                        error!("event stream failed: {}", e);
                        stream_error = Some(e);
                        break;
                    }
                    None => {
                        info!("event stream closed");
                        break;
                    }
                },
                Some(joined) = self.sessions.join_next(), if !self.sessions.is_empty() => {
                    reap(joined);
                }
            }
        }

        self.drain().await;
        match stream_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Wait for every running session to finish.
    pub async fn drain(&mut self) {
        if !self.sessions.is_empty() {
            info!(sessions = self.sessions.len(), "waiting for running games");
        }
        while let Some(joined) = self.sessions.join_next().await {
            reap(joined);
        }
    }

    /// Handle one account event.
    pub async fn handle_event(&mut self, event: IncomingEvent) {
        match event {
            IncomingEvent::Challenge(challenge) => self.on_challenge(challenge).await,
            IncomingEvent::GameStart(game) => self.on_game_start(game),
            IncomingEvent::GameFinish(game) => self.on_game_finish(game),
            IncomingEvent::ChallengeCanceled(c) => {
                debug!(challenge_id = %c.id, "challenge canceled")
            }
            IncomingEvent::ChallengeDeclined(c) => {
                debug!(challenge_id = %c.id, "challenge declined")
            }
            IncomingEvent::Unknown(kind) => warn!("unknown event type {:?}", kind),
        }
    }

    async fn on_challenge(&mut self, challenge: Challenge) {
        let admission = admit(&challenge, self.counter.current(), self.counter.max());

        let result = match admission {
            Admission::Accept => {
                info!(
                    challenge_id = %challenge.id,
                    challenger = challenge.challenger_name(),
                    "accepting challenge"
                );
                self.server.accept_challenge(&challenge.id).await
            }
            Admission::Decline(reason) => {
                info!(
                    challenge_id = %challenge.id,
                    challenger = challenge.challenger_name(),
                    %reason,
                    "declining challenge"
                );
                self.server.decline_challenge(&challenge.id, reason).await
            }
        };

        if let Err(e) = result {
            warn!(challenge_id = %challenge.id, "failed to answer challenge: {}", e);
        }
    }

    fn on_game_start(&mut self, game: GameInfo) {
        if self.active.contains(&game.game_id) {
            debug!(game_id = %game.game_id, "game already running");
            return;
        }

        if !self.counter.try_acquire() {
            warn!(
                game_id = %game.game_id,
                max_games = self.counter.max(),
                "game started with no free slot; not playing it"
            );
            return;
        }

        info!(
            game_id = %game.game_id,
            opponent = game.opponent_name(),
            active = self.counter.current(),
            "starting game session"
        );
        self.active.insert(game.game_id.clone());

        let server = Arc::clone(&self.server);
        let launcher = Arc::clone(&self.launcher);
        let settings = Arc::clone(&self.settings);
        self.sessions.spawn(async move {
            let game_id = game.game_id.clone();
            let result = run_session(game, server, launcher, settings).await;
            (game_id, result)
        });
    }

    fn on_game_finish(&mut self, game: GameRef) {
        if !self.active.remove(&game.game_id) {
            debug!(game_id = %game.game_id, "finish for a game we are not playing");
            return;
        }

        self.counter.release();
        info!(
            game_id = %game.game_id,
            active = self.counter.current(),
            "game finished"
        );
    }
}

fn reap(joined: Result<SessionResult, JoinError>) {
    match joined {
        Ok((game_id, Ok(outcome))) => info!(game_id = %game_id, ?outcome, "session ended"),
        Ok((game_id, Err(e))) => {
            error!(game_id = %game_id, "session failed: {:#}", anyhow::Error::new(e))
        }
        Err(e) => error!("session task aborted: {}", e),
    }
}

