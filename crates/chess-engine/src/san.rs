//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! Parsing never mutates the position: the text is tokenized, then matched
//! against the legal moves of the position.

use crate::movegen::{generate_moves, make_move, MoveList};
use crate::rules::is_check;
use crate::Position;
use chess_core::{File, Move, MoveFlag, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The text is not well-formed SAN.
    #[error("malformed move '{0}'")]
    Malformed(String),
    /// No legal move matches the text.
    #[error("illegal move '{0}'")]
    Illegal(String),
    /// More than one legal move matches the text.
    #[error("ambiguous move '{0}'")]
    Ambiguous(String),
}

/// Characters that may trail a move without changing it.
const DECORATIONS: &[char] = &['+', '#', '!', '?'];

/// Converts a legal move to SAN given the position before the move.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = String::new();

    match m.flag() {
        Some(MoveFlag::CastleKingside) => san.push_str("O-O"),
        Some(MoveFlag::CastleQueenside) => san.push_str("O-O-O"),
        _ => {
            match m.piece().san_char() {
                Some(letter) => {
                    san.push(letter);
                    san.push_str(&disambiguation(position, m));
                }
                None if m.is_capture() => san.push(m.from().file().to_char()),
                None => {}
            }
            if m.is_capture() {
                san.push('x');
            }
            san.push_str(&m.to().to_algebraic());
            if let Some(letter) = m.promotion().and_then(Piece::san_char) {
                san.push('=');
                san.push(letter);
            }
        }
    }

    let after = make_move(position, m);
    if is_check(&after) {
        san.push(if generate_moves(&after).is_empty() {
            '#'
        } else {
            '+'
        });
    }
    san
}

/// Parses a SAN string and returns the corresponding legal move.
pub fn san_to_move(position: &Position, text: &str) -> Result<Move, SanError> {
    let san = text.trim().trim_end_matches(DECORATIONS);
    if san.is_empty() {
        return Err(SanError::Malformed(text.to_string()));
    }

    let moves = generate_moves(position);

    let castle = match san {
        "O-O" | "0-0" => Some(MoveFlag::CastleKingside),
        "O-O-O" | "0-0-0" => Some(MoveFlag::CastleQueenside),
        _ => None,
    };
    if let Some(flag) = castle {
        return moves
            .iter()
            .find(|m| m.flag() == Some(flag))
            .copied()
            .ok_or_else(|| SanError::Illegal(text.to_string()));
    }

    let parsed = parse_san_components(san).ok_or_else(|| SanError::Malformed(text.to_string()))?;
    find_matching_move(&moves, &parsed, text)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
    is_capture: bool,
}

fn parse_san_components(san: &str) -> Option<ParsedSan> {
    let mut rest = san;

    let piece = match rest.chars().next()? {
        c if c.is_ascii_uppercase() => {
            rest = &rest[1..];
            Piece::from_san_char(c)?
        }
        _ => Piece::Pawn,
    };

    let mut promotion = None;
    if let Some(last) = rest.chars().last().filter(char::is_ascii_uppercase) {
        let promoted = Piece::from_san_char(last).filter(|p| p.is_promotion_target())?;
        rest = rest[..rest.len() - 1].trim_end_matches('=');
        promotion = Some(promoted);
    }

    if !rest.is_ascii() || rest.len() < 2 {
        return None;
    }
    let (head, dest) = rest.split_at(rest.len() - 2);
    let to = Square::from_algebraic(dest)?;

    let (disambig, is_capture) = match head.strip_suffix('x') {
        Some(before) => (before, true),
        None => (head, false),
    };

    let (from_file, from_rank) = match disambig.as_bytes() {
        [] => (None, None),
        [c] => {
            let c = *c as char;
            match (File::from_char(c), Rank::from_char(c)) {
                (Some(file), _) => (Some(file), None),
                (None, Some(rank)) => (None, Some(rank)),
                (None, None) => return None,
            }
        }
        [f, r] => (
            Some(File::from_char(*f as char)?),
            Some(Rank::from_char(*r as char)?),
        ),
        _ => return None,
    };

    // A pawn names its origin only by file, and only when capturing.
    if piece == Piece::Pawn && (from_rank.is_some() || from_file.is_some() != is_capture) {
        return None;
    }

    Some(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
        is_capture,
    })
}

fn find_matching_move(moves: &MoveList, parsed: &ParsedSan, text: &str) -> Result<Move, SanError> {
    let mut matching = moves.iter().filter(|m| {
        !m.is_castling()
            && m.piece() == parsed.piece
            && m.to() == parsed.to
            && m.promotion() == parsed.promotion
            && (m.is_capture() || !parsed.is_capture)
            && parsed.from_file.map_or(true, |f| m.from().file() == f)
            && parsed.from_rank.map_or(true, |r| m.from().rank() == r)
    });

    match (matching.next(), matching.next()) {
        (None, _) => Err(SanError::Illegal(text.to_string())),
        (Some(m), None) => Ok(*m),
        (Some(_), Some(_)) => Err(SanError::Ambiguous(text.to_string())),
    }
}

/// Returns the shortest origin hint that singles out `m` among moves of
/// the same piece kind to the same square.
fn disambiguation(position: &Position, m: Move) -> String {
    let from = m.from();
    let rivals: Vec<Square> = generate_moves(position)
        .iter()
        .filter(|o| {
            o.piece() == m.piece() && o.to() == m.to() && o.from() != from && !o.is_castling()
        })
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_algebraic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn parse_pawn_and_piece_moves() {
        let start = Position::startpos();
        let e4 = san_to_move(&start, "e4").unwrap();
        assert_eq!((e4.from(), e4.to(), e4.piece()), (sq("e2"), sq("e4"), Piece::Pawn));

        let nf3 = san_to_move(&start, "Nf3").unwrap();
        assert_eq!((nf3.from(), nf3.to()), (Square::G1, sq("f3")));
    }

    #[test]
    fn decorations_are_ignored() {
        let start = Position::startpos();
        assert_eq!(
            san_to_move(&start, "e4!?").unwrap(),
            san_to_move(&start, "e4").unwrap()
        );
        assert_eq!(
            san_to_move(&start, " Nc3+ ").unwrap(),
            san_to_move(&start, "Nc3").unwrap()
        );
    }

    #[test]
    fn malformed_inputs() {
        let start = Position::startpos();
        for text in ["", "   ", "++", "xyz", "Zf3", "e9", "N", "e4e5e6", "Nf3x", "é4"] {
            assert!(
                matches!(san_to_move(&start, text), Err(SanError::Malformed(_))),
                "{:?} should be malformed",
                text
            );
        }
    }

    #[test]
    fn illegal_inputs() {
        let start = Position::startpos();
        for text in ["e5", "Ke2", "O-O", "Nf4", "Qxd7"] {
            assert!(
                matches!(san_to_move(&start, text), Err(SanError::Illegal(_))),
                "{:?} should be illegal",
                text
            );
        }
    }

    #[test]
    fn ambiguous_knight_move() {
        let position = pos("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
        assert!(matches!(
            san_to_move(&position, "Nd2"),
            Err(SanError::Ambiguous(_))
        ));
        assert_eq!(san_to_move(&position, "Nbd2").unwrap().from(), sq("b1"));
        assert_eq!(san_to_move(&position, "Nfd2").unwrap().from(), sq("f1"));
    }

    #[test]
    fn rank_disambiguation() {
        let position = pos("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
        let m = san_to_move(&position, "R1a3").unwrap();
        assert_eq!(m.from(), Square::A1);
        assert_eq!(move_to_san(&position, m), "R1a3");
    }

    #[test]
    fn captures_and_en_passant() {
        let position = pos("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let ep = san_to_move(&position, "exf6").unwrap();
        assert!(ep.is_en_passant());
        assert_eq!(move_to_san(&position, ep), "exf6");

        // A pawn capture must name its file.
        assert!(matches!(
            san_to_move(&position, "xf6"),
            Err(SanError::Malformed(_))
        ));
    }

    #[test]
    fn capture_marker_requires_a_capture() {
        let start = Position::startpos();
        assert!(matches!(
            san_to_move(&start, "Nxf3"),
            Err(SanError::Illegal(_))
        ));
    }

    #[test]
    fn promotion_forms() {
        let position = pos("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        let with_eq = san_to_move(&position, "a8=Q").unwrap();
        let without = san_to_move(&position, "a8Q").unwrap();
        assert_eq!(with_eq, without);
        assert_eq!(with_eq.promotion(), Some(Piece::Queen));
        assert_eq!(san_to_move(&position, "a8=N").unwrap().promotion(), Some(Piece::Knight));

        assert!(matches!(san_to_move(&position, "a8"), Err(SanError::Illegal(_))));
        assert!(matches!(san_to_move(&position, "a8=K"), Err(SanError::Malformed(_))));
        assert!(matches!(san_to_move(&position, "a8=P"), Err(SanError::Malformed(_))));
    }

    #[test]
    fn castling_notations() {
        let position = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let short = san_to_move(&position, "O-O").unwrap();
        assert_eq!(short.flag(), Some(MoveFlag::CastleKingside));
        assert_eq!(san_to_move(&position, "0-0").unwrap(), short);
        let long = san_to_move(&position, "0-0-0").unwrap();
        assert_eq!(long.flag(), Some(MoveFlag::CastleQueenside));
        assert_eq!(move_to_san(&position, short), "O-O");
        assert_eq!(move_to_san(&position, long), "O-O-O");
    }

    #[test]
    fn check_and_mate_suffixes() {
        let position = pos("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        let mate = san_to_move(&position, "Qh4#").unwrap();
        assert_eq!(move_to_san(&position, mate), "Qh4#");

        let check = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let m = san_to_move(&check, "Ra8").unwrap();
        assert_eq!(move_to_san(&check, m), "Ra8+");
    }

    #[test]
    fn san_roundtrips_for_all_legal_moves() {
        for fen in [
            chess_core::FenParser::STARTPOS,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
        ] {
            let position = pos(fen);
            for m in generate_moves(&position).iter() {
                let san = move_to_san(&position, *m);
                assert_eq!(san_to_move(&position, &san), Ok(*m), "{} in {}", san, fen);
            }
        }
    }

    #[test]
    fn parsing_does_not_touch_the_position() {
        let position = Position::startpos();
        let before = position.clone();
        let _ = san_to_move(&position, "e4");
        let _ = san_to_move(&position, "Ke2");
        assert_eq!(position, before);
        assert_eq!(position.side_to_move, Color::White);
    }
}
