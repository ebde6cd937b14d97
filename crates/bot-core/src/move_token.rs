//! Validated move tokens.
//!
//! Grammar: `[a-h][1-8][a-h][1-8][qrbn]?` (long algebraic, as used by
//! both the server and the engine).

use std::fmt;

/// A move token such as `e2e4` or `e7e8q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveToken(String);

impl MoveToken {
    /// Parse a token, rejecting anything outside the grammar.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        let well_formed = match bytes.len() {
            4 => is_square(bytes[0], bytes[1]) && is_square(bytes[2], bytes[3]),
            5 => {
                is_square(bytes[0], bytes[1])
                    && is_square(bytes[2], bytes[3])
                    && matches!(bytes[4], b'q' | b'r' | b'b' | b'n')
            }
            _ => false,
        };

        if well_formed {
            Some(MoveToken(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MoveToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_square(file: u8, rank: u8) -> bool {
    (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank)
}
