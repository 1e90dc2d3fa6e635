//! Render configuration.

use serde::{Deserialize, Serialize};

/// An RGB color as written in configuration files: `[r, g, b]`.
pub type Rgb = [u8; 3];

/// Colors and sizes used to draw a board.
///
/// Every field has a default, so a TOML table only needs the keys it
/// changes:
///
/// ```toml
/// square_size = 48
/// light_square = [238, 238, 210]
/// coordinates = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of one square in pixels.
    pub square_size: u32,
    pub light_square: Rgb,
    pub dark_square: Rgb,
    pub white_piece: Rgb,
    pub black_piece: Rgb,
    /// Drawn around every piece so both colors stand out on both squares.
    pub outline: Rgb,
    /// Draw file letters and rank digits in a frame around the board.
    pub coordinates: bool,
    pub frame: Rgb,
    pub coordinate_color: Rgb,
}

impl RenderOptions {
    /// Smallest square that still fits a glyph pixel per cell.
    pub const MIN_SQUARE_SIZE: u32 = 16;

    /// Largest square size accepted.
    pub const MAX_SQUARE_SIZE: u32 = 256;

    /// Width of the coordinate frame, zero when coordinates are off.
    pub fn margin(&self) -> u32 {
        if self.coordinates {
            self.square_size / 2
        } else {
            0
        }
    }

    /// Edge length of the whole image in pixels.
    pub fn image_size(&self) -> u32 {
        self.square_size * 8 + self.margin() * 2
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            square_size: 64,
            light_square: [240, 217, 181],
            dark_square: [181, 136, 99],
            white_piece: [250, 250, 250],
            black_piece: [40, 40, 40],
            outline: [20, 20, 20],
            coordinates: false,
            frame: [60, 44, 32],
            coordinate_color: [226, 196, 150],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let options: RenderOptions = toml::from_str(
            r#"
            square_size = 32
            dark_square = [118, 150, 86]
            "#,
        )
        .unwrap();
        assert_eq!(options.square_size, 32);
        assert_eq!(options.dark_square, [118, 150, 86]);
        assert_eq!(options.light_square, RenderOptions::default().light_square);
        assert!(!options.coordinates);
    }

    #[test]
    fn image_size_accounts_for_frame() {
        let mut options = RenderOptions {
            square_size: 40,
            ..RenderOptions::default()
        };
        assert_eq!(options.image_size(), 320);
        options.coordinates = true;
        assert_eq!(options.margin(), 20);
        assert_eq!(options.image_size(), 360);
    }
}
