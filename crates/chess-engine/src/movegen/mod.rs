//! Move generation.
//!
//! Pseudo-legal moves are generated per piece kind and then filtered by
//! playing each one and testing whether the mover's king is left attacked.
//! Castling follows Chess960 rules, which include standard castling as the
//! special case of rooks on the a- and h-files.

mod attacks;
pub mod perft;

use crate::position::CastleSide;
use crate::{Bitboard, Position};
use chess_core::{Color, Move, MoveFlag, Piece, Rank, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// The list holds pseudo-legal moves before they are filtered. A validated
/// position has at most 16 pieces per side and no piece has more than 27
/// moves, which bounds the capacity without heap allocation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 16 * 27;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if the list holds `m`.
    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();

    generate_pawn_moves(position, &mut moves);
    for piece in [
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        generate_piece_moves(position, piece, &mut moves);
    }
    generate_castling_moves(position, &mut moves);

    let us = position.side_to_move;
    moves.retain(|m| !is_king_attacked(&make_move(position, *m), us));

    moves
}

/// Returns true if the side to move has at least one legal move.
pub fn has_legal_moves(position: &Position) -> bool {
    !generate_moves(position).is_empty()
}

/// Returns true if `m` is legal in `position`.
pub fn is_legal(position: &Position, m: Move) -> bool {
    generate_moves(position).contains(&m)
}

fn capture_of(position: &Position, m: Move) -> Move {
    match position.piece_at(m.to()) {
        Some((captured, _)) => m.with_capture(captured),
        None => m,
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let their_pieces = position.colors[us.opposite().index()];
    let empty = !position.occupied();
    let pawns = position.pieces_of(Piece::Pawn, us);

    let (single, double, back) = match us {
        Color::White => {
            let single = pawns.north() & empty;
            (single, (single & Bitboard::rank(Rank::R3)).north() & empty, -1i8)
        }
        Color::Black => {
            let single = pawns.south() & empty;
            (single, (single & Bitboard::rank(Rank::R6)).south() & empty, 1i8)
        }
    };

    let mut push_pawn = |m: Move| {
        if m.to().rank() == us.promotion_rank() {
            for promotion in Piece::PROMOTIONS {
                moves.push(m.with_promotion(promotion));
            }
        } else {
            moves.push(m);
        }
    };

    for to in single {
        if let Some(from) = to.offset(0, back) {
            push_pawn(Move::new(from, to, Piece::Pawn));
        }
    }

    for to in double {
        if let Some(from) = to.offset(0, 2 * back) {
            push_pawn(Move::new(from, to, Piece::Pawn));
        }
    }

    for from in pawns {
        for to in pawn_attacks(from, us) & their_pieces {
            push_pawn(capture_of(position, Move::new(from, to, Piece::Pawn)));
        }
    }

    if let Some(ep_square) = position.en_passant {
        for from in pawns {
            if pawn_attacks(from, us).contains(ep_square) {
                push_pawn(
                    Move::new(from, ep_square, Piece::Pawn)
                        .with_capture(Piece::Pawn)
                        .with_flag(MoveFlag::EnPassant),
                );
            }
        }
    }
}

/// Returns the squares a `piece` of `color` on `sq` attacks.
pub fn piece_attacks(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

/// Generates pseudo-legal moves for knights, sliders and the king (without castling).
fn generate_piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    let us = position.side_to_move;
    let our_pieces = position.colors[us.index()];
    let occupied = position.occupied();

    for from in position.pieces_of(piece, us) {
        for to in piece_attacks(piece, us, from, occupied) & !our_pieces {
            moves.push(capture_of(position, Move::new(from, to, piece)));
        }
    }
}

/// Generates castling moves whose path is clear and unattacked.
///
/// The move records the king's journey; in Chess960 the king may already
/// stand on its target square, in which case `from == to`.
fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let rank = us.back_rank();

    let Some(king) = position.king_square(us) else {
        return;
    };
    if king.rank() != rank || is_square_attacked(position, king, them) {
        return;
    }

    for side in CastleSide::ALL {
        if !position.castling.has(us, side) {
            continue;
        }
        let rook = position.castling.rook_square(us, side);
        if position.piece_at(rook) != Some((Piece::Rook, us)) {
            continue;
        }

        let king_to = Square::new(side.king_target(), rank);
        let rook_to = Square::new(side.rook_target(), rank);

        let king_path = Bitboard::rank_span(rank, king.file(), king_to.file());
        let rook_path = Bitboard::rank_span(rank, rook.file(), rook_to.file());
        let castlers = Bitboard::from_square(king) | Bitboard::from_square(rook);
        let must_be_empty = (king_path | rook_path) & !castlers;

        if (position.occupied() & must_be_empty).is_not_empty() {
            continue;
        }
        if king_path
            .into_iter()
            .any(|sq| is_square_attacked(position, sq, them))
        {
            continue;
        }

        let flag = match side {
            CastleSide::Kingside => MoveFlag::CastleKingside,
            CastleSide::Queenside => MoveFlag::CastleQueenside,
        };
        moves.push(Move::new(king, king_to, Piece::King).with_flag(flag));
    }
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let occupied = position.occupied();
    let enemy = |piece| position.pieces_of(piece, by_color);

    let diagonal = enemy(Piece::Bishop) | enemy(Piece::Queen);
    let orthogonal = enemy(Piece::Rook) | enemy(Piece::Queen);

    (pawn_attacks(sq, by_color.opposite()) & enemy(Piece::Pawn)).is_not_empty()
        || (knight_attacks(sq) & enemy(Piece::Knight)).is_not_empty()
        || (king_attacks(sq) & enemy(Piece::King)).is_not_empty()
        || (bishop_attacks(sq, occupied) & diagonal).is_not_empty()
        || (rook_attacks(sq, occupied) & orthogonal).is_not_empty()
}

/// Returns true if the king of the given color is attacked.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    position
        .king_square(king_color)
        .is_some_and(|king| is_square_attacked(position, king, king_color.opposite()))
}

/// Plays a move and returns the resulting position.
///
/// The move is trusted to be pseudo-legal in `position`; legality is the
/// caller's concern (see [`generate_moves`]).
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut new_pos = position.clone();
    let us = position.side_to_move;
    let from = m.from();
    let to = m.to();

    match m.flag() {
        Some(MoveFlag::CastleKingside) | Some(MoveFlag::CastleQueenside) => {
            let side = if m.flag() == Some(MoveFlag::CastleKingside) {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook_from = position.castling.rook_square(us, side);
            let rook_to = Square::new(side.rook_target(), us.back_rank());
            // King and rook may swap squares in Chess960, so lift both first.
            new_pos.remove(from);
            new_pos.remove(rook_from);
            new_pos.put(to, Piece::King, us);
            new_pos.put(rook_to, Piece::Rook, us);
        }
        Some(MoveFlag::EnPassant) => {
            new_pos.remove(from);
            new_pos.remove(Square::new(to.file(), from.rank()));
            new_pos.put(to, Piece::Pawn, us);
        }
        None => {
            new_pos.remove(from);
            new_pos.remove(to);
            new_pos.put(to, m.promotion().unwrap_or(m.piece()), us);
        }
    }

    if m.piece() == Piece::King {
        new_pos.castling.remove_color(us);
    }
    for color in Color::ALL {
        for side in CastleSide::ALL {
            let rook = position.castling.rook_square(color, side);
            if rook == from || rook == to {
                new_pos.castling.remove(color, side);
            }
        }
    }

    new_pos.en_passant = None;
    if m.piece() == Piece::Pawn && from.rank().index().abs_diff(to.rank().index()) == 2 {
        new_pos.en_passant = from.offset(0, if us == Color::White { 1 } else { -1 });
    }

    if m.is_zeroing() {
        new_pos.halfmove_clock = 0;
    } else {
        new_pos.halfmove_clock += 1;
    }
    if us == Color::Black {
        new_pos.fullmove_number += 1;
    }
    new_pos.side_to_move = us.opposite();

    new_pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn has_flag(moves: &MoveList, flag: MoveFlag) -> bool {
        moves.iter().any(|m| m.flag() == Some(flag))
    }

    #[test]
    fn densest_known_position_fits() {
        let position =
            Position::from_fen("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1").unwrap();
        assert_eq!(generate_moves(&position).len(), 218);
    }

    #[test]
    fn movelist_push_and_retain() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let m1 = Move::new(sq("e2"), sq("e4"), Piece::Pawn);
        let m2 = Move::new(sq("d2"), sq("d4"), Piece::Pawn);
        let m3 = Move::new(sq("e2"), sq("e3"), Piece::Pawn);
        list.push(m1);
        list.push(m2);
        list.push(m3);
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], m2);
        assert!(list.contains(&m3));

        list.retain(|m| m.from() == sq("e2"));
        assert_eq!(list.as_slice(), &[m1, m3]);
    }

    #[test]
    fn generate_moves_startpos() {
        let moves = generate_moves(&Position::startpos());
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn make_move_double_push_sets_en_passant() {
        let m = Move::new(sq("e2"), sq("e4"), Piece::Pawn);
        let new_pos = make_move(&Position::startpos(), m);
        assert_eq!(new_pos.side_to_move, Color::Black);
        assert_eq!(new_pos.piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));
        assert!(new_pos.piece_at(sq("e2")).is_none());
        assert_eq!(new_pos.en_passant, Some(sq("e3")));
        assert_eq!(new_pos.halfmove_clock, 0);
        assert_eq!(new_pos.fullmove_number, 1);
    }

    #[test]
    fn make_move_updates_clocks() {
        let m = Move::new(Square::G1, sq("f3"), Piece::Knight);
        let new_pos = make_move(&Position::startpos(), m);
        assert_eq!(new_pos.piece_at(sq("f3")), Some((Piece::Knight, Color::White)));
        assert_eq!(new_pos.halfmove_clock, 1);
        assert_eq!(new_pos.en_passant, None);

        let reply = Move::new(Square::G8, sq("f6"), Piece::Knight);
        let after = make_move(&new_pos, reply);
        assert_eq!(after.halfmove_clock, 2);
        assert_eq!(after.fullmove_number, 2);
    }

    #[test]
    fn captures_record_the_taken_piece() {
        let position =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let moves = generate_moves(&position);
        let capture = moves
            .iter()
            .find(|m| m.from() == sq("e4") && m.to() == sq("d5"))
            .copied()
            .unwrap();
        assert_eq!(capture.captured(), Some(Piece::Pawn));
    }

    #[test]
    fn is_square_attacked_startpos() {
        let position = Position::startpos();
        assert!(is_square_attacked(&position, sq("e3"), Color::White));
        assert!(!is_square_attacked(&position, sq("e4"), Color::White));
        assert!(!is_king_attacked(&position, Color::White));
        assert!(!is_king_attacked(&position, Color::Black));
    }

    #[test]
    fn castling_both_sides() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&position);
        assert!(has_flag(&moves, MoveFlag::CastleKingside));
        assert!(has_flag(&moves, MoveFlag::CastleQueenside));
    }

    #[test]
    fn castling_moves_king_and_rook() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let castle = Move::new(Square::E1, Square::C1, Piece::King)
            .with_flag(MoveFlag::CastleQueenside);
        let after = make_move(&position, castle);
        assert_eq!(after.piece_at(Square::C1), Some((Piece::King, Color::White)));
        assert_eq!(after.piece_at(Square::D1), Some((Piece::Rook, Color::White)));
        assert_eq!(after.piece_at(Square::A1), None);
        assert!(after.piece_at(Square::E1).is_none());
        assert!(!after.castling.has(Color::White, CastleSide::Kingside));
        assert!(after.castling.has(Color::Black, CastleSide::Queenside));
    }

    #[test]
    fn no_castling_through_check() {
        // The rook on f2 covers f1 but leaves the queenside path alone.
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&position);
        assert!(!has_flag(&moves, MoveFlag::CastleKingside));
        assert!(has_flag(&moves, MoveFlag::CastleQueenside));
    }

    #[test]
    fn no_castling_out_of_check() {
        let position =
            Position::from_fen("r3k2r/pppp1ppp/8/4r3/8/8/PPPP1PPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&position);
        assert!(!has_flag(&moves, MoveFlag::CastleKingside));
        assert!(!has_flag(&moves, MoveFlag::CastleQueenside));
    }

    #[test]
    fn rook_capture_removes_castling_right() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/1B6/R3K2R w KQkq - 0 1").unwrap();
        let take = Move::new(sq("b2"), Square::H8, Piece::Bishop).with_capture(Piece::Rook);
        assert!(is_legal(&position, take));

        let after = make_move(&position, take);
        assert!(!after.castling.has(Color::Black, CastleSide::Kingside));
        assert!(after.castling.has(Color::Black, CastleSide::Queenside));
        assert!(after.castling.has(Color::White, CastleSide::Kingside));
    }

    #[test]
    fn chess960_castling_with_king_on_target() {
        // King already on g1: castling only moves the rook.
        let position = Position::from_fen("6kr/8/8/8/8/8/8/6KR w Hh - 0 1").unwrap();
        let castle = generate_moves(&position)
            .iter()
            .find(|m| m.is_castling())
            .copied()
            .unwrap();
        assert_eq!(castle.from(), Square::G1);
        assert_eq!(castle.to(), Square::G1);

        let after = make_move(&position, castle);
        assert_eq!(after.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(after.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(after.piece_at(Square::H1), None);
        assert!(!after.castling.has(Color::White, CastleSide::Kingside));
    }

    #[test]
    fn chess960_castling_swaps_king_and_rook() {
        let position = Position::from_fen("5k2/8/8/8/8/8/8/5KR1 w G - 0 1").unwrap();
        let castle = Move::new(Square::F1, Square::G1, Piece::King)
            .with_flag(MoveFlag::CastleKingside);
        assert!(is_legal(&position, castle));

        let after = make_move(&position, castle);
        assert_eq!(after.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(after.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(after.occupied().count(), 3);
    }

    #[test]
    fn en_passant_capture() {
        let position =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3")
                .unwrap();
        let moves = generate_moves(&position);
        let ep = moves
            .iter()
            .find(|m| m.is_en_passant())
            .copied()
            .unwrap();
        assert_eq!(ep.captured(), Some(Piece::Pawn));

        let after = make_move(&position, ep);
        assert_eq!(after.piece_at(sq("e6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(after.piece_at(sq("e5")), None);
    }

    #[test]
    fn pinned_en_passant_is_illegal() {
        // Capturing e.p. would expose the white king on a5 to the rook on h5.
        let position = Position::from_fen("4k3/8/8/K2pP2r/8/8/8/8 w - d6 0 2").unwrap();
        assert!(!generate_moves(&position).iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn promotion_generates_four_pieces() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let moves = generate_moves(&position);
        let promotions: Vec<Piece> = moves.iter().filter_map(|m| m.promotion()).collect();
        assert_eq!(promotions.len(), 4);
        for piece in Piece::PROMOTIONS {
            assert!(promotions.contains(&piece));
        }
    }

    #[test]
    fn checkmated_side_has_no_moves() {
        let position = Position::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(is_king_attacked(&position, Color::White));
        assert!(!has_legal_moves(&position));
    }
}
