//! bot-protocol
//!
//! Line-level encoding/decoding for the search engine process.
//!
//! The engine speaks a strictly synchronous, line-oriented protocol:
//! one command line in, one response out (two lines for `go`). This
//! crate turns typed commands into lines and validates response lines
//! into closed result types.
//!
//! - [`command`]  : outbound `EngineCommand` encoding
//! - [`response`] : inbound grammars (acks, search replies, FEN, bench)
//! - [`wire`]     : keywords and literal responses

pub mod wire;
pub mod command;
pub mod response;
pub mod error;

pub use command::EngineCommand;
pub use error::ProtocolError;
pub use response::{
    finish_search,
    parse_ack,
    parse_bench,
    parse_position,
    parse_search_line,
    BenchResult,
    SearchLine,
    SearchReply,
};
