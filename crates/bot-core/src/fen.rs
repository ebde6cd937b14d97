//! Reading the few FEN fields the bot cares about.
//!
//! This is not a board parser: the placement field is passed to the
//! engine untouched. Only side to move, halfmove clock and fullmove
//! number are read, to place a resumed game on the ply axis and to
//! sanity-check fifty-move draw claims.

use crate::color::Color;
use crate::error::FenError;

/// The standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Counters extracted from a FEN string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FenInfo {
    pub side_to_move: Color,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenInfo {
    /// Read side to move and move counters from a six-field FEN.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount {
                fen: fen.to_string(),
                found: fields.len(),
            });
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidField {
                    field: "side to move",
                    value: other.to_string(),
                })
            }
        };

        let halfmove_clock = fields[4].parse::<u32>().map_err(|_| FenError::InvalidField {
            field: "halfmove clock",
            value: fields[4].to_string(),
        })?;

        let fullmove_number = fields[5]
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| FenError::InvalidField {
                field: "fullmove number",
                value: fields[5].to_string(),
            })?;

        Ok(FenInfo {
            side_to_move,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Half-moves played from the standard start to reach this position.
    pub fn ply(&self) -> usize {
        let full = (self.fullmove_number as usize - 1) * 2;
        match self.side_to_move {
            Color::White => full,
            Color::Black => full + 1,
        }
    }
}
