//! Independent check of fifty-move draw claims.
//!
//! The engine may answer a move request with a draw claim. The bot has
//! no rules engine, so it cannot recompute the halfmove clock exactly,
//! but it can bound it from above: the clock at the session's base
//! position plus every ply applied since. If even that bound is below
//! 100 plies the claim cannot be valid.

/// Plies without capture or pawn move needed for a fifty-move claim.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Upper bound on the halfmove clock, anchored at a base position.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FiftyMoveWitness {
    base_halfmove_clock: u32,
    base_ply: usize,
}

impl FiftyMoveWitness {
    /// Anchored at the standard starting position.
    pub fn from_start() -> Self {
        FiftyMoveWitness::default()
    }

    /// Anchored at a position reached after `ply` half-moves whose FEN
    /// halfmove clock read `halfmove_clock`.
    pub fn from_position(halfmove_clock: u32, ply: usize) -> Self {
        FiftyMoveWitness {
            base_halfmove_clock: halfmove_clock,
            base_ply: ply,
        }
    }

    /// Largest halfmove clock possible after `current_ply` half-moves.
    pub fn clock_upper_bound(&self, current_ply: usize) -> u32 {
        let since = current_ply.saturating_sub(self.base_ply);
        let since = u32::try_from(since).unwrap_or(u32::MAX);
        self.base_halfmove_clock.saturating_add(since)
    }

    /// Whether a fifty-move claim at `current_ply` is possible at all.
    pub fn claim_plausible(&self, current_ply: usize) -> bool {
        self.clock_upper_bound(current_ply) >= FIFTY_MOVE_PLIES
    }
}
