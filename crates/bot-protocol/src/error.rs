//! Errors raised while validating engine responses.

use thiserror::Error;

/// An engine response that does not fit the expected grammar, or an
/// explicit rejection by the engine. The raw line is always kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// No grammar matched.
    #[error("unrecognised engine response {raw:?}")]
    Unparsed { raw: String },

    /// The engine refused to apply a move.
    #[error("engine rejected move {mv:?}")]
    IllegalMove { mv: String, raw: String },

    /// The engine did not understand the command line it was sent.
    #[error("engine did not understand {command:?}")]
    UnknownCommand { command: String, raw: String },
}

impl ProtocolError {
    pub fn unparsed(raw: &str) -> Self {
        ProtocolError::Unparsed {
            raw: raw.to_string(),
        }
    }

    /// The response line that triggered the error.
    pub fn raw(&self) -> &str {
        match self {
            ProtocolError::Unparsed { raw }
            | ProtocolError::IllegalMove { raw, .. }
            | ProtocolError::UnknownCommand { raw, .. } => raw,
        }
    }
}
