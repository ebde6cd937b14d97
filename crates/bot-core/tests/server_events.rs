// crates/bot-core/tests/server_events.rs
use bot_core::{Color, GameEvent, IncomingEvent, Speed, TimeControlKind};

#[test]
fn challenge_record_decodes() {
    let line = r#"{"type":"challenge","challenge":{"id":"VU0nyvsW","url":"https://lichess.org/VU0nyvsW","status":"created","challenger":{"id":"thibault","name":"thibault","rating":1500},"variant":{"key":"standard","name":"Standard","short":"Std"},"rated":false,"speed":"rapid","timeControl":{"type":"clock","limit":600,"increment":5,"show":"10+5"},"color":"random"}}"#;

    match IncomingEvent::from_json(line).expect("decode") {
        IncomingEvent::Challenge(c) => {
            assert_eq!(c.id, "VU0nyvsW");
            assert!(c.variant.is_standard());
            assert_eq!(c.speed, Speed::Rapid);
            assert_eq!(c.time_control.kind, TimeControlKind::Clock);
            assert_eq!(c.challenger_name(), "thibault");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn unlimited_challenge_decodes_with_other_kinds() {
    let line = r#"{"type":"challenge","challenge":{"id":"x","variant":{"key":"fromPosition"},"speed":"correspondence","timeControl":{"type":"unlimited"}}}"#;

    match IncomingEvent::from_json(line).expect("decode") {
        IncomingEvent::Challenge(c) => {
            assert!(!c.variant.is_standard());
            assert_eq!(c.speed, Speed::Correspondence);
            assert_eq!(c.time_control.kind, TimeControlKind::Unlimited);
            assert_eq!(c.challenger_name(), "unknown");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn game_start_for_a_resumed_game_has_a_resume_point() {
    let line = r#"{"type":"gameStart","game":{"gameId":"abcd1234","fullId":"abcd1234wxyz","color":"black","fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1","hasMoved":false,"isMyTurn":true,"lastMove":"e2e4","opponent":{"id":"bob","username":"Bob","rating":1800},"id":"abcd1234"}}"#;

    match IncomingEvent::from_json(line).expect("decode") {
        IncomingEvent::GameStart(game) => {
            assert_eq!(game.game_id, "abcd1234");
            assert_eq!(game.color, Color::Black);
            assert!(game.is_my_turn);
            assert_eq!(game.opponent_name(), "Bob");

            let (fen, info, last) = game.resume_point().expect("resumed");
            assert!(fen.starts_with("rnbqkbnr/"));
            assert_eq!(info.ply(), 1);
            assert_eq!(last, "e2e4");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn game_start_for_a_new_game_has_no_resume_point() {
    let line = r#"{"type":"gameStart","game":{"gameId":"g1","color":"white","fen":"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1","lastMove":""}}"#;

    match IncomingEvent::from_json(line).expect("decode") {
        IncomingEvent::GameStart(game) => assert!(game.resume_point().is_none()),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn game_finish_and_unknown_tags() {
    let finish = r#"{"type":"gameFinish","game":{"gameId":"g1","id":"g1"}}"#;
    match IncomingEvent::from_json(finish).expect("decode") {
        IncomingEvent::GameFinish(game) => assert_eq!(game.game_id, "g1"),
        other => panic!("unexpected event {:?}", other),
    }

    let unknown = r#"{"type":"somethingNew","payload":1}"#;
    assert_eq!(
        IncomingEvent::from_json(unknown).expect("decode"),
        IncomingEvent::Unknown("somethingNew".to_string())
    );

    assert!(IncomingEvent::from_json("not json").is_err());
}

#[test]
fn game_full_embeds_the_current_state() {
    let line = r#"{"type":"gameFull","id":"g1","rated":false,"variant":{"key":"standard"},"clock":{"initial":300000,"increment":3000},"speed":"blitz","white":{"id":"plybot","name":"plybot","title":"BOT"},"black":{"aiLevel":3},"initialFen":"startpos","state":{"type":"gameState","moves":"e2e4 c7c5","wtime":298000,"btime":297000,"winc":3000,"binc":3000,"status":"started"}}"#;

    match GameEvent::from_json(line).expect("decode") {
        GameEvent::GameFull(full) => {
            assert_eq!(full.player(Color::White).display_name(), "plybot");
            assert_eq!(full.player(Color::Black).display_name(), "AI level 3");
            assert!(full.state.is_started());
            assert_eq!(full.state.history().len(), 2);

            let clock = full.state.clock();
            assert_eq!(clock.white_ms, 298_000);
            assert_eq!(clock.black_ms, 297_000);
            assert_eq!(clock.remaining_ms(Color::Black), 297_000);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn game_stream_side_records() {
    let state = r#"{"type":"gameState","moves":"","wtime":60000,"btime":60000,"winc":0,"binc":0,"status":"started"}"#;
    match GameEvent::from_json(state).expect("decode") {
        GameEvent::GameState(s) => assert!(s.history().is_empty()),
        other => panic!("unexpected event {:?}", other),
    }

    let ended = r#"{"type":"gameState","moves":"f2f3 e7e5 g2g4 d8h4","wtime":1,"btime":1,"winc":0,"binc":0,"status":"mate","winner":"black"}"#;
    match GameEvent::from_json(ended).expect("decode") {
        GameEvent::GameState(s) => assert!(!s.is_started()),
        other => panic!("unexpected event {:?}", other),
    }

    let chat = r#"{"type":"chatLine","room":"player","username":"bob","text":"gl hf"}"#;
    match GameEvent::from_json(chat).expect("decode") {
        GameEvent::ChatLine(c) => assert_eq!(c.text, "gl hf"),
        other => panic!("unexpected event {:?}", other),
    }

    let gone = r#"{"type":"opponentGone","gone":true,"claimWinInSeconds":8}"#;
    match GameEvent::from_json(gone).expect("decode") {
        GameEvent::OpponentGone(g) => {
            assert!(g.gone);
            assert_eq!(g.claim_win_in_seconds, Some(8));
        }
        other => panic!("unexpected event {:?}", other),
    }
}
