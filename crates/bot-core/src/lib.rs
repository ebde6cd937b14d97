//! bot-core
//!
//! Pure game-synchronization logic for the bot:
//! - colors, clocks and move tokens
//! - move history and reconciliation planning
//! - FEN field reading and fifty-move plausibility
//! - challenge admission and the shared concurrency counter
//! - server event payloads
//!
//! Nothing in here performs I/O. The engine protocol lives in
//! `bot-protocol`; processes and HTTP live in `bot-daemon`.

pub mod color;
pub mod clock;
pub mod move_token;
pub mod history;
pub mod fen;
pub mod fifty_move;
pub mod admission;
pub mod counter;
pub mod events;
pub mod error;

pub use color::{is_our_turn, Color};
pub use clock::Clock;
pub use move_token::MoveToken;

pub use history::{plan_sync, AppliedCursor, MoveHistory, SyncPlan};
pub use fen::{FenInfo, START_FEN};
pub use fifty_move::{FiftyMoveWitness, FIFTY_MOVE_PLIES};

pub use admission::{
    admit, Admission, Challenge, Challenger, DeclineReason, Speed, TimeControl, TimeControlKind,
    Variant,
};
pub use counter::{ConcurrencyCounter, DEFAULT_MAX_CONCURRENT_GAMES};

pub use events::{
    ChallengeRef,
    ChatLine,
    GameEvent,
    GameFull,
    GameInfo,
    GameRef,
    GameState,
    IncomingEvent,
    Opponent,
    OpponentGone,
    Player,
};

pub use error::FenError;
