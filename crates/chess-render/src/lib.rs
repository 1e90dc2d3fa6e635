//! PNG snapshots of chess positions.
//!
//! The board is drawn with White at the bottom. Pieces come from a built-in
//! pixel-art glyph set, so output depends only on the position and the
//! [`RenderOptions`]: identical inputs give byte-identical PNGs.
//!
//! ```
//! use chess_engine::Position;
//! use chess_render::{render_png, RenderOptions};
//!
//! let png = render_png(&Position::startpos(), &RenderOptions::default()).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

mod glyphs;
mod options;

pub use options::{RenderOptions, Rgb};

use chess_core::{Color, File, Piece, Rank, Square};
use chess_engine::Position;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use thiserror::Error;

use glyphs::{GLYPH_SIZE, LABEL_HEIGHT, LABEL_WIDTH};

/// Errors that can occur while rendering a board.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The square size is outside the supported range.
    #[error("square size {0} is outside {min}..={max}", min = RenderOptions::MIN_SQUARE_SIZE, max = RenderOptions::MAX_SQUARE_SIZE)]
    InvalidSquareSize(u32),
    /// The PNG encoder failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// A piece placed on the board grid.
///
/// Row 0 is the eighth rank, column 0 the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceView {
    pub row: u32,
    pub col: u32,
    pub piece: Piece,
    pub color: Color,
}

/// Lists the pieces of `position` in screen coordinates.
pub fn piece_views(position: &Position) -> Vec<PieceView> {
    Rank::ALL
        .iter()
        .rev()
        .enumerate()
        .flat_map(|(row, rank)| {
            File::ALL.iter().enumerate().filter_map(move |(col, file)| {
                position
                    .piece_at(Square::new(*file, *rank))
                    .map(|(piece, color)| PieceView {
                        row: row as u32,
                        col: col as u32,
                        piece,
                        color,
                    })
            })
        })
        .collect()
}

/// Draws `position` and returns the PNG bytes.
pub fn render_png(position: &Position, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    let image = render_image(position, options)?;

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(png)
}

/// Draws `position` into an RGBA buffer.
pub fn render_image(position: &Position, options: &RenderOptions) -> Result<RgbaImage, RenderError> {
    let size = options.square_size;
    if !(RenderOptions::MIN_SQUARE_SIZE..=RenderOptions::MAX_SQUARE_SIZE).contains(&size) {
        return Err(RenderError::InvalidSquareSize(size));
    }

    let edge = options.image_size();
    let margin = options.margin();
    let mut image = RgbaImage::from_pixel(edge, edge, rgba(options.frame));

    for (row, rank) in Rank::ALL.iter().rev().enumerate() {
        for (col, file) in File::ALL.iter().enumerate() {
            let color = if Square::new(*file, *rank).is_light() {
                options.light_square
            } else {
                options.dark_square
            };
            fill_rect(
                &mut image,
                margin + col as u32 * size,
                margin + row as u32 * size,
                size,
                size,
                color,
            );
        }
    }

    for view in piece_views(position) {
        draw_piece(&mut image, &view, options);
    }

    if options.coordinates {
        draw_coordinates(&mut image, options);
    }

    Ok(image)
}

fn rgba([r, g, b]: Rgb) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
    let pixel = rgba(color);
    for py in y..(y + h).min(image.height()) {
        for px in x..(x + w).min(image.width()) {
            image.put_pixel(px, py, pixel);
        }
    }
}

fn draw_piece(image: &mut RgbaImage, view: &PieceView, options: &RenderOptions) {
    let size = options.square_size;
    let scale = size / GLYPH_SIZE as u32;
    let inset = (size - scale * GLYPH_SIZE as u32) / 2;
    let left = options.margin() + view.col * size + inset;
    let top = options.margin() + view.row * size + inset;

    let fill = match view.color {
        Color::White => options.white_piece,
        Color::Black => options.black_piece,
    };
    let glyph = glyphs::piece_glyph(view.piece);

    for gy in 0..GLYPH_SIZE {
        for gx in 0..GLYPH_SIZE {
            let (x, y) = (gx as isize, gy as isize);
            let color = if glyphs::is_filled(glyph, x, y) {
                fill
            } else if glyphs::is_outline(glyph, x, y) {
                options.outline
            } else {
                continue;
            };
            fill_rect(
                image,
                left + gx as u32 * scale,
                top + gy as u32 * scale,
                scale,
                scale,
                color,
            );
        }
    }
}

fn draw_coordinates(image: &mut RgbaImage, options: &RenderOptions) {
    let size = options.square_size;
    let margin = options.margin();
    let scale = (margin / (LABEL_HEIGHT as u32 + 2)).max(1);
    let label_w = LABEL_WIDTH as u32 * scale;
    let label_h = LABEL_HEIGHT as u32 * scale;
    let bottom = margin + 8 * size;

    for (col, file) in File::ALL.iter().enumerate() {
        let x = margin + col as u32 * size + (size - label_w) / 2;
        let y = bottom + (margin - label_h) / 2;
        draw_label(image, file.to_char(), x, y, scale, options.coordinate_color);
    }
    for (row, rank) in Rank::ALL.iter().rev().enumerate() {
        let x = (margin - label_w) / 2;
        let y = margin + row as u32 * size + (size - label_h) / 2;
        draw_label(image, rank.to_char(), x, y, scale, options.coordinate_color);
    }
}

fn draw_label(image: &mut RgbaImage, c: char, x: u32, y: u32, scale: u32, color: Rgb) {
    let Some(rows) = glyphs::label_glyph(c) else {
        return;
    };
    for (ly, row) in rows.iter().enumerate() {
        for (lx, cell) in row.bytes().enumerate() {
            if cell == b'#' {
                fill_rect(
                    image,
                    x + lx as u32 * scale,
                    y + ly as u32 * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
    }
}
