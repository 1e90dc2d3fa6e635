//! Chess position representation.

use chess_core::{Color, FenError, FenParser, File, Piece, Rank, Square};

use crate::movegen::is_king_attacked;
use crate::zobrist;
use crate::Bitboard;

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the h-file: king ends on g, rook on f.
    Kingside,
    /// Toward the a-file: king ends on c, rook on d.
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// File the king lands on.
    #[inline]
    pub const fn king_target(self) -> File {
        match self {
            CastleSide::Kingside => File::G,
            CastleSide::Queenside => File::C,
        }
    }

    /// File the rook lands on.
    #[inline]
    pub const fn rook_target(self) -> File {
        match self {
            CastleSide::Kingside => File::F,
            CastleSide::Queenside => File::D,
        }
    }

    const fn index(self) -> usize {
        match self {
            CastleSide::Kingside => 0,
            CastleSide::Queenside => 1,
        }
    }
}

/// Castling rights plus the files the castling rooks start on.
///
/// Rook files are shared by both colors: standard chess uses h/a, Chess960
/// setups mirror the back rank so both sides use the same files as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    flags: u8,
    rook_files: [File; 2],
}

impl CastlingRights {
    /// No castling rights, standard rook files.
    pub const NONE: CastlingRights = CastlingRights {
        flags: 0,
        rook_files: [File::H, File::A],
    };

    /// All four rights with rooks on the h- and a-files.
    pub const STANDARD: CastlingRights = CastlingRights {
        flags: 0b1111,
        rook_files: [File::H, File::A],
    };

    /// All four rights with custom rook files (Chess960).
    pub const fn all_with_rooks(kingside: File, queenside: File) -> Self {
        CastlingRights {
            flags: 0b1111,
            rook_files: [kingside, queenside],
        }
    }

    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        1 << (color.index() * 2 + side.index())
    }

    /// Returns true if `color` may still castle toward `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.flags & Self::bit(color, side) != 0
    }

    /// Returns true if no right is left.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.flags == 0
    }

    /// Grants a right.
    #[inline]
    pub fn insert(&mut self, color: Color, side: CastleSide) {
        self.flags |= Self::bit(color, side);
    }

    /// Removes a right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.flags &= !Self::bit(color, side);
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// File the castling rook for `side` starts on.
    #[inline]
    pub const fn rook_file(self, side: CastleSide) -> File {
        self.rook_files[side.index()]
    }

    /// Square the castling rook for `color` and `side` starts on.
    #[inline]
    pub const fn rook_square(self, color: Color, side: CastleSide) -> Square {
        Square::new(self.rook_file(side), color.back_rank())
    }

    /// Returns true if the rook files are the standard h/a pair.
    #[inline]
    pub fn has_standard_rooks(self) -> bool {
        self.rook_files == [File::H, File::A]
    }

    /// Returns the raw right bits (white kingside = bit 0 ... black queenside = bit 3).
    #[inline]
    pub const fn raw(self) -> u8 {
        self.flags
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::NONE
    }
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bitboards for each piece kind, indexed by [`Piece::index`].
    pub pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub colors: [Bitboard; 2],

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        position.set_up_back_ranks(&back_rank);
        position.castling = CastlingRights::STANDARD;
        position
    }

    /// Places mirrored back ranks and full pawn rows for both colors.
    pub(crate) fn set_up_back_ranks(&mut self, back_rank: &[Piece; 8]) {
        for (file, &piece) in File::ALL.iter().zip(back_rank) {
            for color in Color::ALL {
                self.put(Square::new(*file, color.back_rank()), piece, color);
            }
            self.put(Square::new(*file, Rank::R2), Piece::Pawn, Color::White);
            self.put(Square::new(*file, Rank::R7), Piece::Pawn, Color::Black);
        }
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling accepts both `KQkq` (outermost rook on each side) and
    /// Shredder-style rook files (`HAha`, `GEge`, ...). The resulting
    /// position is checked with [`Position::validate`].
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        for (rank_idx, rank_str) in parsed.piece_placement.split('/').enumerate() {
            let rank = Rank::ALL[7 - rank_idx];
            let mut file = 0u8;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let file_enum = File::from_index(file).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("rank {} overflows", rank))
                    })?;
                    position.put(Square::new(file_enum, rank), piece, color);
                    file += 1;
                }
            }
        }

        position.side_to_move = Color::from_fen_char(parsed.active_color)
            .ok_or_else(|| FenError::InvalidActiveColor(parsed.active_color.to_string()))?;
        position.castling = position.parse_castling(&parsed.castling)?;
        position.en_passant = if parsed.en_passant == "-" {
            None
        } else {
            Square::from_algebraic(&parsed.en_passant)
        };
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        position.validate()?;
        Ok(position)
    }

    fn parse_castling(&self, text: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        let mut files: [Option<File>; 2] = [None, None];

        if text == "-" {
            return Ok(rights);
        }

        for c in text.chars() {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let rank = color.back_rank();
            let king = self
                .king_square(color)
                .filter(|k| k.rank() == rank)
                .ok_or_else(|| {
                    FenError::InvalidCastlingRights(format!("{} king is not on its back rank", color))
                })?;
            let rooks = self.pieces_of(Piece::Rook, color) & Bitboard::rank(rank);

            let (side, file) = match c.to_ascii_lowercase() {
                'k' => {
                    let outer = rooks
                        .into_iter()
                        .filter(|sq| sq.file() > king.file())
                        .last();
                    (CastleSide::Kingside, outer.map(|sq| sq.file()))
                }
                'q' => {
                    let outer = rooks.into_iter().find(|sq| sq.file() < king.file());
                    (CastleSide::Queenside, outer.map(|sq| sq.file()))
                }
                lower => {
                    let file = File::from_char(lower).ok_or_else(|| {
                        FenError::InvalidCastlingRights(format!("invalid character '{}'", c))
                    })?;
                    if file == king.file() {
                        return Err(FenError::InvalidCastlingRights(format!(
                            "rook file {} is the king's file",
                            file
                        )));
                    }
                    let side = if file > king.file() {
                        CastleSide::Kingside
                    } else {
                        CastleSide::Queenside
                    };
                    let present = rooks.contains(Square::new(file, rank));
                    (side, present.then_some(file))
                }
            };

            let file = file.ok_or_else(|| {
                FenError::InvalidCastlingRights(format!("no castling rook for '{}'", c))
            })?;
            match files[side.index()] {
                Some(existing) if existing != file => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "mismatched rook files in '{}'",
                        text
                    )));
                }
                _ => files[side.index()] = Some(file),
            }
            rights.insert(color, side);
        }

        rights.rook_files = [files[0].unwrap_or(File::H), files[1].unwrap_or(File::A)];
        Ok(rights)
    }

    /// Checks the invariants every reachable position satisfies.
    pub fn validate(&self) -> Result<(), FenError> {
        for color in Color::ALL {
            let kings = self.pieces_of(Piece::King, color).count();
            if kings != 1 {
                return Err(FenError::IllegalPosition(format!(
                    "{} has {} kings",
                    color, kings
                )));
            }
        }

        for color in Color::ALL {
            self.validate_material(color)?;
        }

        if (self.pieces[Piece::Pawn.index()] & Bitboard::BACK_RANKS).is_not_empty() {
            return Err(FenError::IllegalPosition(
                "pawn on the first or last rank".to_string(),
            ));
        }

        for color in Color::ALL {
            for side in CastleSide::ALL {
                if !self.castling.has(color, side) {
                    continue;
                }
                let rook = self.castling.rook_square(color, side);
                let king_ok = self
                    .king_square(color)
                    .is_some_and(|k| k.rank() == color.back_rank());
                if !king_ok || self.piece_at(rook) != Some((Piece::Rook, color)) {
                    return Err(FenError::IllegalPosition(format!(
                        "{} castling right without king and rook in place",
                        color
                    )));
                }
            }
        }

        if let Some(ep) = self.en_passant {
            let (expected_rank, pawn_rank) = match self.side_to_move {
                Color::White => (Rank::R6, Rank::R5),
                Color::Black => (Rank::R3, Rank::R4),
            };
            let pawn = Square::new(ep.file(), pawn_rank);
            if ep.rank() != expected_rank
                || self.piece_at(pawn) != Some((Piece::Pawn, self.side_to_move.opposite()))
                || self.piece_at(ep).is_some()
            {
                return Err(FenError::IllegalPosition(format!(
                    "en passant square {} does not follow a double push",
                    ep
                )));
            }
        }

        if is_king_attacked(self, self.side_to_move.opposite()) {
            return Err(FenError::IllegalPosition(
                "side not to move is in check".to_string(),
            ));
        }

        Ok(())
    }

    /// Rejects material no sequence of promotions can produce: at most 16
    /// pieces and 8 pawns, and no more extra officers than missing pawns.
    fn validate_material(&self, color: Color) -> Result<(), FenError> {
        let count = |piece: Piece| self.pieces_of(piece, color).count();
        let total = self.colors[color.index()].count();
        let pawns = count(Piece::Pawn);
        let promoted = count(Piece::Queen).saturating_sub(1)
            + count(Piece::Rook).saturating_sub(2)
            + count(Piece::Bishop).saturating_sub(2)
            + count(Piece::Knight).saturating_sub(2);
        if total > 16 || pawns > 8 || promoted > 8 - pawns {
            return Err(FenError::IllegalPosition(format!(
                "{} has impossible material",
                color
            )));
        }
        Ok(())
    }

    /// Returns the piece placement field of the FEN.
    pub fn board_fen(&self) -> String {
        let mut fen = String::new();
        for (i, rank) in Rank::ALL.iter().rev().enumerate() {
            let mut empty_count = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, *rank)) {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if i < 7 {
                fen.push('/');
            }
        }
        fen
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{} {} {} {} {} {}",
            self.board_fen(),
            self.side_to_move.fen_char(),
            self.castling_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn castling_fen(&self) -> String {
        if self.castling.is_empty() {
            return "-".to_string();
        }
        let standard = self.castling.has_standard_rooks();
        let mut out = String::new();
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if !self.castling.has(color, side) {
                    continue;
                }
                let c = if standard {
                    match side {
                        CastleSide::Kingside => 'k',
                        CastleSide::Queenside => 'q',
                    }
                } else {
                    self.castling.rook_file(side).to_char()
                };
                out.push(match color {
                    Color::White => c.to_ascii_uppercase(),
                    Color::Black => c,
                });
            }
        }
        out
    }

    /// Places a piece on an empty square.
    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    /// Removes whatever stands on `sq`.
    #[inline]
    pub(crate) fn remove(&mut self, sq: Square) {
        for bb in self.pieces.iter_mut().chain(self.colors.iter_mut()) {
            bb.clear(sq);
        }
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = Color::ALL
            .into_iter()
            .find(|c| self.colors[c.index()].contains(sq))?;
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[p.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    /// Returns the square of the king of `color`.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).first()
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of pieces of the given kind and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns the Zobrist hash of this position.
    pub fn zobrist_hash(&self) -> u64 {
        zobrist::hash(self, self.en_passant)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_matches_fen() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(Position::from_fen(FenParser::STARTPOS).unwrap(), pos);
    }

    #[test]
    fn custom_fen_roundtrip() {
        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kq - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn shredder_castling_roundtrip() {
        let fen = "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.castling.rook_file(CastleSide::Kingside), File::H);
        assert_eq!(pos.castling.rook_file(CastleSide::Queenside), File::F);
        assert!(pos.castling.has(Color::Black, CastleSide::Queenside));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn kq_castling_finds_outermost_rook() {
        let pos = Position::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w KQkq - 0 1").unwrap();
        assert_eq!(pos.castling.rook_file(CastleSide::Kingside), File::G);
        assert_eq!(pos.castling.rook_file(CastleSide::Queenside), File::B);
        assert_eq!(pos.to_fen(), "1r2k1r1/8/8/8/8/8/8/1R2K1R1 w GBgb - 0 1");
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::D8), Some((Piece::Queen, Color::Black)));
        assert_eq!(pos.piece_at(Square::from_algebraic("e4").unwrap()), None);
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
    }

    #[test]
    fn castling_rights_bits() {
        let mut rights = CastlingRights::STANDARD;
        assert!(rights.has(Color::White, CastleSide::Kingside));
        rights.remove(Color::White, CastleSide::Kingside);
        assert!(!rights.has(Color::White, CastleSide::Kingside));
        assert!(rights.has(Color::White, CastleSide::Queenside));
        rights.remove_color(Color::Black);
        assert_eq!(rights.raw(), 0b0010);
        assert_eq!(rights.rook_square(Color::Black, CastleSide::Queenside), Square::A8);
    }

    #[test]
    fn rejects_missing_or_extra_kings() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::IllegalPosition(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(FenError::IllegalPosition(_))
        ));
    }

    #[test]
    fn rejects_pawn_on_back_rank() {
        assert!(matches!(
            Position::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::IllegalPosition(_))
        ));
    }

    #[test]
    fn rejects_castling_right_without_rook() {
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2R w H - 0 1"),
            Ok(_)
        ));
    }

    #[test]
    fn rejects_opponent_in_check() {
        assert!(matches!(
            Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::IllegalPosition(_))
        ));
        assert!(Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1").is_ok());
    }

    #[test]
    fn rejects_impossible_material() {
        for fen in [
            "QQQQQQrk/Q4Qrr/Q5QQ/Q3Q2Q/Q6Q/Q6Q/Q7/KQQQQQQQ w - - 0 1",
            "4k3/8/8/8/8/P7/PPPPPPPP/4K3 w - - 0 1",
            "4k3/8/8/8/8/QQ6/PPPPPPPP/4K3 w - - 0 1",
        ] {
            assert!(
                matches!(Position::from_fen(fen), Err(FenError::IllegalPosition(_))),
                "{}",
                fen
            );
        }
        // Eight promoted knights with every pawn gone.
        assert!(Position::from_fen("7k/8/8/8/8/8/NNNNNNNN/NN2K3 w - - 0 1").is_ok());
    }

    #[test]
    fn rejects_inconsistent_en_passant() {
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").is_ok());
    }

    #[test]
    fn zobrist_depends_on_side_and_rights() {
        let start = Position::startpos();
        let mut black = start.clone();
        black.side_to_move = Color::Black;
        let mut no_rights = start.clone();
        no_rights.castling = CastlingRights::NONE;
        assert_ne!(start.zobrist_hash(), black.zobrist_hash());
        assert_ne!(start.zobrist_hash(), no_rights.zobrist_hash());
        assert_eq!(start.zobrist_hash(), Position::startpos().zobrist_hash());
    }
}
