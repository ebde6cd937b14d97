//! Side to move / assigned color.

use serde::Deserialize;

/// Piece color. Also the color the server assigned to the bot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Side to move after `ply_count` half-moves from the standard start.
    ///
    /// Even count => white to move.
    pub fn to_move(ply_count: usize) -> Self {
        if ply_count % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the bot playing `color` is to move after `ply_count` half-moves.
pub fn is_our_turn(ply_count: usize, color: Color) -> bool {
    Color::to_move(ply_count) == color
}
