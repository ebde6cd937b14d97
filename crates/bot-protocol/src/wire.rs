//! Keywords and literal responses of the engine line protocol.
//!
//! Outbound (one line per command):
//!
//! ```text
//! setPosition <fen>
//! makeMove <move>
//! go wtime <ms> btime <ms> winc <ms> binc <ms>
//! bestMove <seconds>
//! getPosition
//! bench depth <n>
//! quit
//! ```
//!
//! Inbound:
//!
//! ```text
//! done                                   ack for setPosition / makeMove / quit
//! '<move>' is not a legal move!          makeMove rejected
//! '<cmd>' is not a valid command         unknown command
//! <move> (<info>)                        bestMove reply
//! info (<info>)  +  bestmove <move>      go reply (two lines)
//! Draw by 50 move rule                   draw claim instead of a move
//! <fen>                                  getPosition reply
//! Bench result: <n> nodes in <s> seconds (depth: <d>)
//! ```

pub const SET_POSITION: &str = "setPosition";
pub const MAKE_MOVE: &str = "makeMove";
pub const GO: &str = "go";
pub const BEST_MOVE: &str = "bestMove";
pub const GET_POSITION: &str = "getPosition";
pub const BENCH: &str = "bench";
pub const QUIT: &str = "quit";

pub const DONE: &str = "done";
pub const DRAW_BY_FIFTY_MOVES: &str = "Draw by 50 move rule";
pub const INFO_PREFIX: &str = "info ";
pub const BESTMOVE_PREFIX: &str = "bestmove ";
pub const BENCH_PREFIX: &str = "Bench result: ";
pub const ILLEGAL_MOVE_SUFFIX: &str = "' is not a legal move!";
pub const INVALID_COMMAND_SUFFIX: &str = "' is not a valid command";
