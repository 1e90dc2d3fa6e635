//! End-to-end games played through the public session API.

use chess_core::Color;
use chess_session::{
    Annotation, AutomaticDraw, DrawClaim, GameState, PlayerId, RuleConfig, Session, SessionError,
};

const KNIGHT_SHUFFLE: [&str; 4] = ["Nf3", "Nf6", "Ng1", "Ng8"];

fn white() -> PlayerId {
    PlayerId::new("white-player")
}

fn black() -> PlayerId {
    PlayerId::new("black-player")
}

fn new_game() -> Session {
    Session::new(white(), black(), None).unwrap()
}

fn without_automatic_draws() -> Session {
    new_game()
        .with_rules(RuleConfig {
            automatic_draws: false,
        })
        .unwrap()
}

fn play(session: &mut Session, moves: &[&str]) {
    for san in moves {
        let player = session.turn().player;
        session
            .move_piece(&player, san)
            .unwrap_or_else(|e| panic!("{} failed: {}", san, e));
    }
}

#[test]
fn first_move_passes_the_turn() {
    let mut session = new_game();
    let outcome = session.move_piece(&white(), "e4").unwrap();

    assert!(!outcome.game_over);
    assert_eq!(outcome.summary.player, white());
    assert_eq!(outcome.summary.color, Color::White);
    assert_eq!(outcome.summary.move_number, 1);
    assert_eq!(outcome.summary.san, "e4");
    assert_eq!(outcome.summary.to_string(), "Move 1: white-player (White) played e4");

    let turn = session.turn();
    assert_eq!(turn.color, Color::Black);
    assert_eq!(turn.player, black());
    assert_eq!(turn.next_player, white());
    assert_eq!(session.total_moves(), 1);
}

#[test]
fn moving_out_of_turn_is_rejected() {
    let mut session = new_game();
    let before = session.clone();

    let err = session.move_piece(&black(), "e5").unwrap_err();
    assert_eq!(err, SessionError::NotYourTurn(black()));
    assert!(err.is_illegal_move());
    assert_eq!(session, before);
}

#[test]
fn turn_order_ignores_identifier_order() {
    let mut session = Session::new("zed", "amy", None).unwrap();
    assert_eq!(session.turn().player, PlayerId::new("zed"));
    session.move_piece(&PlayerId::new("zed"), "d4").unwrap();
    assert_eq!(session.turn().player, PlayerId::new("amy"));
}

#[test]
fn fools_mate_ends_in_checkmate() {
    let mut session = new_game();
    play(&mut session, &["f3", "e5", "g4"]);
    let outcome = session.move_piece(&black(), "Qh4#").unwrap();

    assert!(outcome.game_over);
    assert_eq!(outcome.summary.annotation, Some(Annotation::Checkmate));
    assert_eq!(
        session.state(),
        GameState::Checkmate {
            winner: Color::Black
        }
    );
    assert_eq!(session.winner(), Some(&black()));
    assert_eq!(session.move_piece(&white(), "e4"), Err(SessionError::GameOver));
}

#[test]
fn fifty_moves_become_claimable() {
    let mut session = without_automatic_draws();
    for _ in 0..24 {
        play(&mut session, &KNIGHT_SHUFFLE);
    }
    play(&mut session, &KNIGHT_SHUFFLE[..3]);
    assert_eq!(session.position().halfmove_clock, 99);
    assert!(!session.can_claim_fifty_moves());

    play(&mut session, &KNIGHT_SHUFFLE[3..]);
    assert_eq!(session.total_moves(), 100);
    assert!(session.can_claim_fifty_moves());

    let claim: DrawClaim = "Fifty moves".parse().unwrap();
    assert_eq!(
        session.claim_draw(claim),
        Ok(GameState::DrawClaimed(DrawClaim::FiftyMoves))
    );
    assert!(session.is_game_over());
}

#[test]
fn fifty_move_flag_holds_until_a_pawn_moves() {
    let mut session = Session::from_fen(white(), black(), "4k3/8/8/8/8/8/P6R/4K3 w - - 99 60")
        .unwrap();
    play(&mut session, &["Rh3"]);
    assert!(session.can_claim_fifty_moves());
    play(&mut session, &["Kd7"]);
    assert!(session.can_claim_fifty_moves());
    play(&mut session, &["a3"]);
    assert!(!session.can_claim_fifty_moves());
}

#[test]
fn unclaimable_draw_is_rejected() {
    let mut session = new_game();
    play(&mut session, &["e4", "e5"]);

    assert_eq!(
        session.claim_draw(DrawClaim::FiftyMoves),
        Err(SessionError::DrawNotClaimable(DrawClaim::FiftyMoves))
    );
    assert_eq!(
        session.claim_draw(DrawClaim::ThreefoldRepetition),
        Err(SessionError::DrawNotClaimable(DrawClaim::ThreefoldRepetition))
    );
    assert_eq!(session.state(), GameState::InProgress);
}

#[test]
fn resignation_ignores_turn() {
    let mut session = new_game();
    play(&mut session, &["e4"]);
    assert_eq!(session.turn().player, black());

    assert_eq!(
        session.resign(&white()),
        Ok(GameState::Resigned {
            winner: Color::Black
        })
    );
    assert_eq!(session.winner(), Some(&black()));
}

#[test]
fn strangers_cannot_resign() {
    let mut session = new_game();
    assert_eq!(
        session.resign(&PlayerId::new("eve")),
        Err(SessionError::NotAPlayer(PlayerId::new("eve")))
    );
    assert_eq!(session.state(), GameState::InProgress);
}

#[test]
fn threefold_flag_tracks_occurrences() {
    let mut session = without_automatic_draws();
    play(&mut session, &KNIGHT_SHUFFLE);
    assert!(!session.can_claim_threefold_repetition());
    play(&mut session, &KNIGHT_SHUFFLE[..3]);
    assert!(!session.can_claim_threefold_repetition());

    // Third occurrence of the starting position.
    play(&mut session, &KNIGHT_SHUFFLE[3..]);
    assert!(session.can_claim_threefold_repetition());
    play(&mut session, &["e4"]);
    assert!(!session.can_claim_threefold_repetition());
}

#[test]
fn fivefold_repetition_is_automatic_when_enabled() {
    let mut session = new_game();
    for _ in 0..3 {
        play(&mut session, &KNIGHT_SHUFFLE);
    }
    play(&mut session, &KNIGHT_SHUFFLE[..3]);
    assert_eq!(session.state(), GameState::InProgress);

    let outcome = session.move_piece(&black(), "Ng8").unwrap();
    assert!(outcome.game_over);
    assert_eq!(
        session.state(),
        GameState::DrawAutomatic(AutomaticDraw::FivefoldRepetition)
    );
}

#[test]
fn fivefold_repetition_never_ends_a_game_when_disabled() {
    let mut session = without_automatic_draws();
    for _ in 0..6 {
        play(&mut session, &KNIGHT_SHUFFLE);
    }
    assert_eq!(session.state(), GameState::InProgress);
    assert!(session.can_claim_threefold_repetition());
}

#[test]
fn chess960_games_start_from_their_setup() {
    // Setup 0 is BBQNNRKR: king on g1, rooks on f1 and h1.
    let mut session = Session::new(white(), black(), Some("chess960:0")).unwrap();
    assert_eq!(session.variant_tag(), "chess960:0");
    assert_eq!(
        session.fen(),
        "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w HFhf - 0 1"
    );

    // The f1 rook stands on the h1 rook's target square.
    assert!(matches!(
        session.move_piece(&white(), "O-O"),
        Err(SessionError::IllegalMove(_))
    ));
    play(&mut session, &["Nf3", "Nf6"]);
    assert_eq!(session.total_moves(), 2);
}

#[test]
fn random_chess960_records_its_setup() {
    let session = Session::new(white(), black(), Some("chess960")).unwrap();
    assert!(session.variant_tag().starts_with("chess960:"));
    assert!(!session.legal_moves().is_empty());
}
