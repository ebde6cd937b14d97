//! Move histories and reconciliation planning.
//!
//! Two histories exist per game: the server's authoritative list and
//! the list the engine has applied, tracked by an [`AppliedCursor`].
//! [`plan_sync`] compares the cursor with a fresh server list and says
//! which moves the engine must apply so both lists are equal again.

/// Ordered list of move tokens, as reported by the server.
///
/// Tokens are stored verbatim; legality is the server's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<String>,
}

impl MoveHistory {
    pub fn new() -> Self {
        MoveHistory::default()
    }

    /// Parse the server's space-separated move list.
    ///
    /// An empty string yields an empty history (not one empty token).
    pub fn parse(moves: &str) -> Self {
        MoveHistory {
            moves: moves.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn from_moves<I, S>(moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MoveHistory {
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of half-moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.moves.last().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.moves.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.moves
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(String::as_str)
    }
}

/// The engine-side view of a game: which moves it has applied.
///
/// Normally the whole applied list is known. A resumed game starts
/// from a server position, so only the ply index and the last move are
/// known until the first full history arrives; `base` marks where the
/// known tail starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedCursor {
    base: usize,
    tail: Vec<String>,
}

impl AppliedCursor {
    /// Nothing applied yet; the engine sits on the starting position.
    pub fn start() -> Self {
        AppliedCursor::default()
    }

    /// The engine was set to a mid-game position reached after `ply`
    /// half-moves, the last of which was `last_move`.
    pub fn resumed(ply: usize, last_move: impl Into<String>) -> Self {
        if ply == 0 {
            return AppliedCursor::start();
        }
        AppliedCursor {
            base: ply - 1,
            tail: vec![last_move.into()],
        }
    }

    /// Number of half-moves the engine has applied.
    pub fn ply(&self) -> usize {
        self.base + self.tail.len()
    }

    pub fn last_move(&self) -> Option<&str> {
        self.tail.last().map(String::as_str)
    }

    /// Record that the engine now matches `history` exactly.
    pub fn advance_to(&mut self, history: &MoveHistory) {
        self.base = 0;
        self.tail = history.as_slice().to_vec();
    }

    /// Whether the known applied moves sit at the same indices in `server`.
    fn is_prefix_of(&self, server: &[String]) -> bool {
        let end = self.ply();
        end <= server.len() && server[self.base..end] == self.tail[..]
    }
}

/// What the engine must do to catch up with a server history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan<'a> {
    /// Apply these moves on top of the current engine position.
    /// May be empty when nothing new arrived.
    Incremental(&'a [String]),

    /// The histories diverged: reset to the starting position and
    /// apply the whole list.
    Replay(&'a [String]),
}

impl<'a> SyncPlan<'a> {
    /// The moves to apply, regardless of plan kind.
    pub fn moves(&self) -> &'a [String] {
        match self {
            SyncPlan::Incremental(moves) | SyncPlan::Replay(moves) => moves,
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, SyncPlan::Replay(_))
    }
}

/// Decide how to bring the engine from `cursor` to `server`.
///
/// If the engine's applied moves are a prefix of the server list only
/// the remainder is applied. Anything else (missing last move, shorter
/// list, rewritten history) falls back to a full replay from the
/// starting position, which is always correct.
pub fn plan_sync<'a>(cursor: &AppliedCursor, server: &'a MoveHistory) -> SyncPlan<'a> {
    let all = server.as_slice();

    if cursor.is_prefix_of(all) {
        SyncPlan::Incremental(&all[cursor.ply()..])
    } else {
        SyncPlan::Replay(all)
    }
}
