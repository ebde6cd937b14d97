//! Time-control values forwarded to the engine.

use crate::color::Color;

/// Remaining time and increment for both sides, in milliseconds.
///
/// Copied verbatim from the server's game state and passed to the
/// engine unmodified; nothing here computes a think time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Clock {
    pub white_ms: u64,
    pub black_ms: u64,
    pub white_inc_ms: u64,
    pub black_inc_ms: u64,
}

impl Clock {
    /// Remaining time of `color`.
    pub fn remaining_ms(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_ms,
            Color::Black => self.black_ms,
        }
    }
}
