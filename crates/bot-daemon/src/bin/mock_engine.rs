// crates/bot-daemon/src/bin/mock_engine.rs
//
// Stand-in engine speaking the engine line protocol, used by the
// process-channel tests.

use std::io::{self, BufRead, Write};

use clap::Parser;

use bot_core::{MoveToken, START_FEN};
use bot_protocol::wire::{
    BENCH, BENCH_PREFIX, BESTMOVE_PREFIX, BEST_MOVE, DONE, DRAW_BY_FIFTY_MOVES, GET_POSITION, GO,
    ILLEGAL_MOVE_SUFFIX, INFO_PREFIX, INVALID_COMMAND_SUFFIX, MAKE_MOVE, QUIT, SET_POSITION,
};

#[derive(Parser)]
#[clap(name = "mock-engine")]
struct Cli {
    /// Transposition table size, as the real engine takes it
    #[clap(long, default_value = "64")]
    tt_size_mb: u32,

    /// Moves returned by successive searches, comma separated
    #[clap(long, default_value = "e2e4")]
    moves: String,

    /// Answer every search with the fifty-move claim
    #[clap(long)]
    draw: bool,

    /// Exit without replying once this many commands were handled
    #[clap(long)]
    crash_after: Option<usize>,

    /// Never answer commands with this keyword
    #[clap(long)]
    mute: Option<String>,
}

struct MockEngine {
    moves: Vec<String>,
    searches: usize,
    draw: bool,
    position: String,
}

impl MockEngine {
    fn new(cli: &Cli) -> Self {
        let mut moves: Vec<String> = cli
            .moves
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if moves.is_empty() {
            moves.push("e2e4".to_string());
        }

        MockEngine {
            moves,
            searches: 0,
            draw: cli.draw,
            position: START_FEN.to_string(),
        }
    }

    fn next_move(&mut self) -> String {
        let mv = self.moves[self.searches % self.moves.len()].clone();
        self.searches += 1;
        mv
    }

    /// Response lines for one command. Empty means stop.
    fn respond(&mut self, line: &str) -> Vec<String> {
        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));

        match keyword {
            SET_POSITION if !rest.is_empty() => {
                self.position = rest.to_string();
                vec![DONE.to_string()]
            }
            MAKE_MOVE => match MoveToken::parse(rest) {
                Some(_) => vec![DONE.to_string()],
                None => vec![format!("'{}{}", rest, ILLEGAL_MOVE_SUFFIX)],
            },
            GO => {
                if self.draw {
                    return vec![DRAW_BY_FIFTY_MOVES.to_string()];
                }
                let mv = self.next_move();
                vec![
                    format!("{}(depth: 1, {})", INFO_PREFIX, rest),
                    format!("{}{}", BESTMOVE_PREFIX, mv),
                ]
            }
            BEST_MOVE => {
                if self.draw {
                    return vec![DRAW_BY_FIFTY_MOVES.to_string()];
                }
                let mv = self.next_move();
                vec![format!("{} (eval: 0)", mv)]
            }
            GET_POSITION => vec![self.position.clone()],
            BENCH => {
                let depth = rest.strip_prefix("depth ").unwrap_or("1");
                vec![format!("{}1000 nodes in 0.010 seconds (depth: {})", BENCH_PREFIX, depth)]
            }
            QUIT => vec![DONE.to_string()],
            _ => vec![format!("'{}{}", line, INVALID_COMMAND_SUFFIX)],
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let mut engine = MockEngine::new(&cli);
    eprintln!("mock engine ready (tt {} MB)", cli.tt_size_mb);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for (handled, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if cli.crash_after == Some(handled) {
            eprintln!("mock engine crashing on {:?}", line);
            std::process::exit(3);
        }

        let keyword = line.split(' ').next().unwrap_or("");
        if cli.mute.as_deref() == Some(keyword) {
            continue;
        }

        for reply in engine.respond(line) {
            writeln!(stdout, "{}", reply)?;
        }
        stdout.flush()?;

        if keyword == QUIT {
            break;
        }
    }

    Ok(())
}
