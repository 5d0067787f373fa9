//! TTF/OTF glyph rasterization.
//!
//! Renders characters with fontdue and places them in a fixed cell:
//! - ink is centered horizontally, ignoring the font's side bearings
//! - the baseline sits at `floor(height * baseline)`, descenders go below it
//! - the rendered canvas is reduced to 1 bit per pixel according to the [`RenderMode`]

use crate::{
    config::{RasterSettings, RenderMode, TargetSize},
    glyph::Glyph,
    source::GlyphSource,
};

/// Value a monochrome canvas stores for a set pixel.
const MONO_SET: u8 = 1;

/// Coverage at which a monochrome canvas sets a pixel (pixel center inside the outline).
const MONO_COVERAGE: u8 = 128;

/// A parsed outline font.
pub struct OutlineFont {
    font: fontdue::Font,
}

/// Coverage bitmap of one rendered character.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGlyph {
    /// Offset of the ink box's left edge from the glyph origin
    pub left: i32,
    /// Offset of the ink box's bottom edge from the baseline (negative for descenders)
    pub bottom: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, 0-255, top row first
    pub coverage: Vec<u8>,
}

impl OutlineFont {
    pub fn from_bytes(data: Vec<u8>) -> std::result::Result<Self, &'static str> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())?;
        Ok(Self { font })
    }

    /// Render `ch` at `px_size` pixels per em.
    ///
    /// Returns `None` when the character has no ink: the font lacks it or it renders empty (space).
    pub fn render(&self, ch: char, px_size: f32) -> Option<RenderedGlyph> {
        if self.font.lookup_glyph_index(ch) == 0 {
            return None;
        }
        let (metrics, coverage) = self.font.rasterize(ch, px_size);
        if metrics.width == 0 || metrics.height == 0 || coverage.iter().all(|&c| c == 0) {
            return None;
        }
        Some(RenderedGlyph {
            left: metrics.xmin,
            bottom: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            coverage,
        })
    }

    /// A glyph source producing `size` cells from this font.
    pub fn rasterizer(&self, size: TargetSize, settings: RasterSettings) -> OutlineRasterizer<'_> {
        OutlineRasterizer { font: self, size, settings }
    }
}

pub struct OutlineRasterizer<'a> {
    font: &'a OutlineFont,
    size: TargetSize,
    settings: RasterSettings,
}

impl GlyphSource for OutlineRasterizer<'_> {
    fn cell_size(&self) -> (usize, usize) {
        (self.size.width, self.size.height)
    }

    fn glyph(&self, codepoint: u32) -> Glyph {
        let rendered = char::from_u32(codepoint).and_then(|ch| self.font.render(ch, self.size.size));
        match rendered {
            Some(rendered) => rasterize(codepoint, &rendered, self.size.width, self.size.height, &self.settings),
            None => {
                log::debug!("no ink for {codepoint} at {}, using blank glyph", self.size);
                Glyph::blank(codepoint, self.size.width, self.size.height)
            }
        }
    }
}

/// Place a rendered character into a `width` x `height` cell and binarize it.
pub fn rasterize(codepoint: u32, rendered: &RenderedGlyph, width: usize, height: usize, settings: &RasterSettings) -> Glyph {
    // Integer division truncates toward zero, glyphs wider than the cell overhang on both sides.
    let x_offset = (width as i32 - rendered.width as i32) / 2 - rendered.left;
    let baseline_row = settings.baseline_row(height);

    // Screen coordinates grow downwards, the ink top is `bottom + height` above the baseline.
    let left = x_offset + rendered.left;
    let top = baseline_row - (rendered.bottom + rendered.height as i32);

    let mut canvas = Canvas::new(width, height, settings.mode);
    for gy in 0..rendered.height {
        for gx in 0..rendered.width {
            let coverage = rendered.coverage[gy * rendered.width + gx];
            canvas.draw(left + gx as i32, top + gy as i32, coverage);
        }
    }
    canvas.binarize(codepoint, settings.threshold)
}

/// Intensity canvas of `height` rows x `width` columns.
struct Canvas {
    width: usize,
    height: usize,
    mode: RenderMode,
    data: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize, mode: RenderMode) -> Self {
        Self {
            width,
            height,
            mode,
            data: vec![0; width * height],
        }
    }

    /// Draw one pixel of coverage, clipping to the canvas.
    fn draw(&mut self, x: i32, y: i32, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let pixel = &mut self.data[y as usize * self.width + x as usize];
        match self.mode {
            RenderMode::Grayscale => *pixel = (*pixel).max(coverage),
            RenderMode::Monochrome => {
                if coverage >= MONO_COVERAGE {
                    *pixel = MONO_SET;
                }
            }
        }
    }

    fn is_ink(&self, value: u8, threshold: u8) -> bool {
        match self.mode {
            RenderMode::Grayscale => value >= threshold,
            RenderMode::Monochrome => value == MONO_SET,
        }
    }

    fn binarize(&self, codepoint: u32, threshold: u8) -> Glyph {
        let mut glyph = Glyph::blank(codepoint, self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_ink(self.data[y * self.width + x], threshold) {
                    glyph.set_pixel(x, y, true);
                }
            }
        }
        glyph
    }
}
