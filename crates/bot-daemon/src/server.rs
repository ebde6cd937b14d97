//! The remote game server, as seen by the dispatcher and sessions.
//!
//! [`GameServer`] is the seam between the bot and the outside world:
//! the production implementation is [`crate::lichess::LichessClient`],
//! tests use an in-memory server.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use bot_core::{DeclineReason, GameEvent, IncomingEvent};

/// A long-lived server event stream.
pub type EventStream<T> = BoxStream<'static, Result<T, ServerError>>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Transport failure (connection, TLS, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The server refused a call for a reason of its own.
    #[error("{0}")]
    Refused(String),
}

#[async_trait]
pub trait GameServer: Send + Sync {
    /// Account-level events: challenges, game starts and finishes.
    async fn incoming_events(&self) -> Result<EventStream<IncomingEvent>, ServerError>;

    /// Events of one game, starting with `gameFull`.
    async fn game_events(&self, game_id: &str) -> Result<EventStream<GameEvent>, ServerError>;

    async fn accept_challenge(&self, challenge_id: &str) -> Result<(), ServerError>;

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: DeclineReason,
    ) -> Result<(), ServerError>;

    async fn make_move(&self, game_id: &str, mv: &str) -> Result<(), ServerError>;

    async fn post_chat(&self, game_id: &str, text: &str) -> Result<(), ServerError>;
}
