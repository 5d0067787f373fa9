//! Canonical fixed-grid glyph representation.
//!
//! Pixels are stored column-major: all `height` cells of column 0 first,
//! then column 1 and so on. This matches the `[W][H]` layout of the
//! generated C arrays, so a column can be written out as one slice.

use std::fmt::Display;

/// First codepoint of the generated range (space).
pub const FIRST: u32 = 32;

/// Last codepoint of the generated range (`~`).
pub const LAST: u32 = 126;

/// Number of glyphs in every table.
pub const COUNT: usize = (LAST - FIRST + 1) as usize;

/// Largest accepted cell width or height in pixels.
pub const MAX_CELL_SIDE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub codepoint: u32,
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Glyph {
    /// Create an all-zero glyph.
    pub fn blank(codepoint: u32, width: usize, height: usize) -> Self {
        Self {
            codepoint,
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Build a glyph from row-major scanlines (`rows[y][x]`), transposing
    /// them into the column-major grid.
    ///
    /// Rows must already be normalized to `height` entries; missing cells read as off.
    pub fn from_rows(codepoint: u32, width: usize, height: usize, rows: &[Vec<bool>]) -> Self {
        let mut glyph = Self::blank(codepoint, width, height);
        for (y, row) in rows.iter().enumerate().take(height) {
            for (x, &pixel) in row.iter().enumerate().take(width) {
                glyph.set_pixel(x, y, pixel);
            }
        }
        glyph
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The character this glyph represents.
    pub fn ch(&self) -> char {
        char::from_u32(self.codepoint).unwrap_or(' ')
    }

    /// Get a pixel value at the given position.
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[x * self.height + y]
    }

    /// Set a pixel value at the given position.
    ///
    /// Does nothing if coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[x * self.height + y] = value;
    }

    /// All cells of column `x`, top to bottom.
    pub fn column(&self, x: usize) -> &[bool] {
        &self.pixels[x * self.height..(x + 1) * self.height]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[bool]> {
        // chunks() panics on 0
        self.pixels.chunks(self.height.max(1)).take(self.width)
    }

    /// Check if the glyph is empty (all pixels off).
    pub fn is_empty(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }
}

impl Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            write!(f, "{y:2} ")?;
            for x in 0..self.width {
                f.write_str(if self.get_pixel(x, y) { "#" } else { "-" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
