//! Built-in pixel-art bitmaps for pieces and board coordinates.

use chess_core::Piece;

/// Width and height of a piece glyph in cells.
pub const GLYPH_SIZE: usize = 16;

/// Width of a coordinate label in cells.
pub const LABEL_WIDTH: usize = 3;

/// Height of a coordinate label in cells.
pub const LABEL_HEIGHT: usize = 5;

const PAWN: [&str; GLYPH_SIZE] = [
    "................",
    "................",
    "................",
    "......####......",
    ".....######.....",
    ".....######.....",
    "......####......",
    ".....######.....",
    "......####......",
    "......####......",
    ".....######.....",
    "....########....",
    "...##########...",
    "...##########...",
    "................",
    "................",
];

const KNIGHT: [&str; GLYPH_SIZE] = [
    "................",
    "................",
    "......##.#......",
    ".....#######....",
    "....#########...",
    "...####.######..",
    "...###########..",
    "..#####..#####..",
    "..####...#####..",
    ".......######...",
    "......######....",
    ".....#######....",
    "....#########...",
    "...###########..",
    "...###########..",
    "................",
];

const BISHOP: [&str; GLYPH_SIZE] = [
    "................",
    ".......##.......",
    "......####......",
    ".....##.###.....",
    ".....#.####.....",
    ".....######.....",
    "......####......",
    ".......##.......",
    "......####......",
    ".....######.....",
    "......####......",
    "......####......",
    ".....######.....",
    "...##########...",
    "...##########...",
    "................",
];

const ROOK: [&str; GLYPH_SIZE] = [
    "................",
    "................",
    "...##..##..##...",
    "...##########...",
    "...##########...",
    "....########....",
    ".....######.....",
    ".....######.....",
    ".....######.....",
    ".....######.....",
    ".....######.....",
    "....########....",
    "...##########...",
    "..############..",
    "..############..",
    "................",
];

const QUEEN: [&str; GLYPH_SIZE] = [
    "................",
    ".#.....##.....#.",
    ".##...####...##.",
    ".###..####..###.",
    ".####.####.####.",
    ".##############.",
    "..############..",
    "...##########...",
    "....########....",
    "....########....",
    ".....######.....",
    "....########....",
    "...##########...",
    "..############..",
    "..############..",
    "................",
];

const KING: [&str; GLYPH_SIZE] = [
    ".......##.......",
    ".....######.....",
    ".......##.......",
    ".....######.....",
    "....########....",
    "..##.######.##..",
    ".######..######.",
    ".##############.",
    "..############..",
    "...##########...",
    "....########....",
    ".....######.....",
    "....########....",
    "...##########...",
    "...##########...",
    "................",
];

/// Returns the bitmap rows of a piece glyph.
pub fn piece_glyph(piece: Piece) -> &'static [&'static str; GLYPH_SIZE] {
    match piece {
        Piece::Pawn => &PAWN,
        Piece::Knight => &KNIGHT,
        Piece::Bishop => &BISHOP,
        Piece::Rook => &ROOK,
        Piece::Queen => &QUEEN,
        Piece::King => &KING,
    }
}

/// Returns true if cell (`x`, `y`) of `glyph` is filled. Out of range is empty.
pub fn is_filled(glyph: &[&str], x: isize, y: isize) -> bool {
    if x < 0 || y < 0 {
        return false;
    }
    glyph
        .get(y as usize)
        .and_then(|row| row.as_bytes().get(x as usize))
        .is_some_and(|&cell| cell == b'#')
}

/// Returns true if an empty cell touches a filled one, diagonals included.
pub fn is_outline(glyph: &[&str], x: isize, y: isize) -> bool {
    if is_filled(glyph, x, y) {
        return false;
    }
    (-1..=1).any(|dy| (-1..=1).any(|dx| is_filled(glyph, x + dx, y + dy)))
}

/// Returns the bitmap of a file letter (`a`-`h`) or rank digit (`1`-`8`).
pub fn label_glyph(c: char) -> Option<[&'static str; LABEL_HEIGHT]> {
    let rows = match c {
        'a' => [".#.", "#.#", "###", "#.#", "#.#"],
        'b' => ["##.", "#.#", "##.", "#.#", "##."],
        'c' => [".##", "#..", "#..", "#..", ".##"],
        'd' => ["##.", "#.#", "#.#", "#.#", "##."],
        'e' => ["###", "#..", "##.", "#..", "###"],
        'f' => ["###", "#..", "##.", "#..", "#.."],
        'g' => [".##", "#..", "#.#", "#.#", ".##"],
        'h' => ["#.#", "#.#", "###", "#.#", "#.#"],
        '1' => [".#.", "##.", ".#.", ".#.", "###"],
        '2' => ["##.", "..#", ".#.", "#..", "###"],
        '3' => ["##.", "..#", ".#.", "..#", "##."],
        '4' => ["#.#", "#.#", "###", "..#", "..#"],
        '5' => ["###", "#..", "##.", "..#", "##."],
        '6' => [".##", "#..", "###", "#.#", "###"],
        '7' => ["###", "..#", ".#.", ".#.", ".#."],
        '8' => ["###", "#.#", "###", "#.#", "###"],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_square_and_distinct() {
        let mut seen = Vec::new();
        for piece in Piece::ALL {
            let glyph = piece_glyph(piece);
            assert!(glyph.iter().all(|row| row.len() == GLYPH_SIZE), "{}", piece);
            assert!(glyph.iter().any(|row| row.contains('#')), "{}", piece);
            assert!(!seen.contains(&glyph), "{} duplicates another glyph", piece);
            seen.push(glyph);
        }
    }

    #[test]
    fn outline_surrounds_body() {
        let glyph = piece_glyph(Piece::Pawn);
        assert!(is_filled(glyph, 6, 3));
        assert!(!is_outline(glyph, 6, 3));
        assert!(is_outline(glyph, 6, 2));
        assert!(!is_outline(glyph, 0, 0));
        assert!(!is_filled(glyph, -1, 3));
        assert!(!is_filled(glyph, 16, 3));
    }

    #[test]
    fn labels_cover_files_and_ranks() {
        for c in "abcdefgh12345678".chars() {
            let rows = label_glyph(c).unwrap();
            assert!(rows.iter().all(|row| row.len() == LABEL_WIDTH));
        }
        assert!(label_glyph('i').is_none());
        assert!(label_glyph('9').is_none());
    }
}
