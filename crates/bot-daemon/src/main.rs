// crates/bot-daemon/src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bot_daemon::config::{Config, Overrides};
use bot_daemon::dispatcher::Dispatcher;
use bot_daemon::engine_process::ProcessLauncher;
use bot_daemon::lichess::LichessClient;
use bot_daemon::session::SessionSettings;

#[derive(Parser)]
#[clap(name = "plybot")]
#[clap(about = "Lichess bot that plays every game with its own engine process")]
struct Cli {
    /// TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Engine executable (default: newest build in the releases directory)
    #[clap(short, long)]
    engine: Option<PathBuf>,

    /// Maximum number of games played at once
    #[clap(short, long)]
    max_games: Option<usize>,

    /// Transposition table size passed to each engine
    #[clap(long)]
    tt_size_mb: Option<u32>,

    /// Log filter used when RUST_LOG is not set
    #[clap(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(&Overrides {
        config_file: cli.config,
        engine_path: cli.engine,
        max_games: cli.max_games,
        tt_size_mb: cli.tt_size_mb,
    })
    .context("failed to load configuration")?;

    info!(
        api = %config.api_url,
        engine = %config.engine.path.display(),
        tt_size_mb = config.engine.tt_size_mb,
        max_games = config.max_games,
        "starting plybot"
    );

    let server = LichessClient::new(&config.api_url, &config.token)
        .context("failed to build http client")?;
    let launcher = ProcessLauncher::new(config.engine);
    let dispatcher = Dispatcher::new(
        Arc::new(server),
        Arc::new(launcher),
        SessionSettings {
            greeting: config.greeting,
        },
        config.max_games,
    );

    tokio::select! {
        result = dispatcher.run() => result.context("event stream failed")?,
        _ = tokio::signal::ctrl_c() => warn!("interrupted; shutting down"),
    }

    Ok(())
}
