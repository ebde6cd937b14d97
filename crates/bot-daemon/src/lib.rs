//! bot-daemon
//!
//! Lichess bot daemon: listens on the account event stream, answers
//! challenges, and plays each game against its own engine process.

pub mod config;
pub mod dispatcher;
pub mod engine_client;
pub mod engine_io;
pub mod engine_process;
pub mod lichess;
pub mod releases;
pub mod server;
pub mod session;
