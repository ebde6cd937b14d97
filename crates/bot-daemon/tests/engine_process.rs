// crates/bot-daemon/tests/engine_process.rs
//
// Round trips against the mock-engine binary built with this crate.

use std::time::Duration;

use bot_core::{Clock, Color, START_FEN};
use bot_daemon::config::EngineConfig;
use bot_daemon::engine_client::EngineClient;
use bot_daemon::engine_io::{EngineError, EngineLauncher};
use bot_daemon::engine_process::{EngineProcess, ProcessLauncher};
use bot_protocol::{ProtocolError, SearchReply};

fn mock_engine(args: &[&str]) -> EngineConfig {
    let mut config = EngineConfig::new(env!("CARGO_BIN_EXE_mock-engine"));
    config.args = args.iter().map(|a| a.to_string()).collect();
    config.command_timeout = Duration::from_secs(5);
    config
}

fn client(args: &[&str]) -> EngineClient {
    let config = mock_engine(args);
    let process = EngineProcess::start("test", &config).expect("spawn mock engine");
    EngineClient::new(Box::new(process), config.command_timeout)
}

fn clock() -> Clock {
    Clock {
        white_ms: 30_000,
        black_ms: 30_000,
        white_inc_ms: 0,
        black_inc_ms: 0,
    }
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    let config = EngineConfig::new("/nonexistent/engine-v0.0.0");
    let err = EngineProcess::start("test", &config).err().expect("spawn fails");
    assert!(matches!(err, EngineError::Spawn { .. }));
}

#[tokio::test]
async fn position_and_moves_are_acknowledged() {
    let mut engine = client(&[]);

    engine.set_position(START_FEN).await.unwrap();
    engine.make_move("e2e4").await.unwrap();
    engine.make_move("e7e8q").await.unwrap();
    assert_eq!(engine.position().await.unwrap(), START_FEN);

    engine.terminate().await;
}

#[tokio::test]
async fn rejected_move_is_a_protocol_error() {
    let mut engine = client(&[]);

    let err = engine.make_move("castle").await.unwrap_err();
    match err {
        EngineError::Protocol(ProtocolError::IllegalMove { mv, .. }) => assert_eq!(mv, "castle"),
        other => panic!("unexpected error {:?}", other),
    }

    // The channel stays usable after a rejected command.
    engine.make_move("g1f3").await.unwrap();
    engine.terminate().await;
}

#[tokio::test]
async fn go_returns_the_move_after_the_info_line() {
    let mut engine = client(&["--moves", "d2d4,c2c4"]);

    for expected in ["d2d4", "c2c4", "d2d4"] {
        match engine.go(clock(), Color::White).await.unwrap() {
            SearchReply::Move { mv, info } => {
                assert_eq!(mv.as_str(), expected);
                assert!(info.contains("wtime 30000"));
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    engine.terminate().await;
}

#[tokio::test]
async fn fixed_time_search_and_draw_claims() {
    let mut engine = client(&["--moves", "g1f3"]);
    match engine.best_move(Duration::from_millis(250)).await.unwrap() {
        SearchReply::Move { mv, info } => {
            assert_eq!(mv.as_str(), "g1f3");
            assert_eq!(info, "eval: 0");
        }
        other => panic!("unexpected reply {:?}", other),
    }
    engine.terminate().await;

    let mut engine = client(&["--draw"]);
    assert_eq!(
        engine.go(clock(), Color::Black).await.unwrap(),
        SearchReply::DrawClaim
    );
    engine.terminate().await;
}

#[tokio::test]
async fn bench_reports_nodes_and_depth() {
    let mut engine = client(&[]);
    let bench = engine.bench_depth(6).await.unwrap();
    assert_eq!(bench.nodes, 1000);
    assert_eq!(bench.depth, 6);
    engine.terminate().await;
}

#[tokio::test]
async fn engine_exit_is_reported_as_died() {
    let mut engine = client(&["--crash-after", "1"]);

    engine.set_position(START_FEN).await.unwrap();
    let err = engine.make_move("e2e4").await.unwrap_err();
    assert!(matches!(err, EngineError::Died));

    // Terminating a dead engine is harmless.
    engine.terminate().await;
    engine.terminate().await;
}

#[tokio::test]
async fn silent_engine_times_out() {
    let mut config = mock_engine(&["--mute", "getPosition"]);
    config.command_timeout = Duration::from_millis(200);
    let process = EngineProcess::start("test", &config).unwrap();
    let mut engine = EngineClient::new(Box::new(process), config.command_timeout);

    let err = engine.position().await.unwrap_err();
    match err {
        EngineError::Timeout { command, after } => {
            assert_eq!(command, "getPosition");
            assert_eq!(after, Duration::from_millis(200));
        }
        other => panic!("unexpected error {:?}", other),
    }

    engine.terminate().await;
}

#[tokio::test]
async fn launcher_passes_the_table_size() {
    let mut config = mock_engine(&[]);
    config.tt_size_mb = 16;
    assert_eq!(&config.launch_args()[..2], ["--tt-size-mb", "16"]);

    let launcher = ProcessLauncher::new(config);
    assert_eq!(launcher.command_timeout(), Duration::from_secs(5));

    let io = launcher.launch("g1").await.unwrap();
    let mut engine = EngineClient::new(io, launcher.command_timeout());
    engine.set_position(START_FEN).await.unwrap();
    engine.terminate().await;
}
