//! Chess960 starting arrays in Scharnagl numbering.

use crate::position::{CastlingRights, Position};
use chess_core::{File, Piece};

/// Number of distinct Chess960 starting arrays.
pub const CHESS960_SETUPS: u16 = 960;

/// The setup number of the standard array `RNBQKBNR`.
pub const STANDARD_SETUP: u16 = 518;

/// Knight file pairs among the five squares left after bishops and queen.
const KNIGHT_TABLE: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

/// Returns White's back rank (a-file first) for a setup number.
///
/// Returns `None` when `setup` is not below [`CHESS960_SETUPS`].
pub fn chess960_back_rank(setup: u16) -> Option<[Piece; 8]> {
    if setup >= CHESS960_SETUPS {
        return None;
    }

    let mut rank: [Option<Piece>; 8] = [None; 8];
    let mut n = setup as usize;

    rank[(n % 4) * 2 + 1] = Some(Piece::Bishop);
    n /= 4;
    rank[(n % 4) * 2] = Some(Piece::Bishop);
    n /= 4;

    place_in_empty(&mut rank, n % 6, Piece::Queen);
    n /= 6;

    let (first, second) = KNIGHT_TABLE[n];
    // Placing the later knight first keeps the earlier index stable.
    place_in_empty(&mut rank, second, Piece::Knight);
    place_in_empty(&mut rank, first, Piece::Knight);

    for piece in [Piece::Rook, Piece::King, Piece::Rook] {
        place_in_empty(&mut rank, 0, piece);
    }

    let mut back_rank = [Piece::Pawn; 8];
    for (slot, piece) in back_rank.iter_mut().zip(rank) {
        *slot = piece?;
    }
    Some(back_rank)
}

fn place_in_empty(rank: &mut [Option<Piece>; 8], nth: usize, piece: Piece) {
    if let Some(slot) = rank.iter_mut().filter(|slot| slot.is_none()).nth(nth) {
        *slot = Some(piece);
    }
}

/// Builds the starting position of a setup with full castling rights.
pub(crate) fn chess960_position(setup: u16) -> Option<Position> {
    let back_rank = chess960_back_rank(setup)?;
    let rook_files: Vec<File> = File::ALL
        .into_iter()
        .zip(back_rank)
        .filter(|(_, piece)| *piece == Piece::Rook)
        .map(|(file, _)| file)
        .collect();

    let mut position = Position::empty();
    position.set_up_back_ranks(&back_rank);
    position.castling = CastlingRights::all_with_rooks(rook_files[1], rook_files[0]);
    Some(position)
}
