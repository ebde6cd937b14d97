//! Error types for the pure core.
//!
//! Most of the core is infallible; invalid server payloads are
//! rejected by serde before they reach it. FEN reading is the
//! exception since positions arrive as opaque strings.

use thiserror::Error;

/// Failure to read the fields the bot needs out of a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// Fewer or more than six whitespace-separated fields.
    #[error("expected 6 FEN fields, found {found} in {fen:?}")]
    FieldCount { fen: String, found: usize },

    /// A field did not have the expected shape.
    #[error("invalid FEN {field} field {value:?}")]
    InvalidField { field: &'static str, value: String },
}
