use crate::{
    glyph::{Glyph, COUNT, FIRST, LAST},
    source::GlyphSource,
};

/// The 95 printable ASCII glyphs of one font at one cell size, indexed by `codepoint - FIRST`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTable {
    /// Font name used for output naming (file stem of the source).
    pub name: String,
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
}

impl GlyphTable {
    /// Resolve every codepoint `FIRST..=LAST` through `source`.
    pub fn build(name: impl Into<String>, source: &dyn GlyphSource) -> Self {
        let (width, height) = source.cell_size();
        let glyphs: Vec<Glyph> = (FIRST..=LAST)
            .map(|codepoint| {
                let glyph = source.glyph(codepoint);
                debug_assert_eq!((glyph.width(), glyph.height()), (width, height));
                glyph
            })
            .collect();

        let empty = glyphs.iter().filter(|g| g.is_empty()).count();
        let name = name.into();
        log::info!("Built {width}x{height} table for {name} ({empty} of {COUNT} glyphs empty)");

        Self { name, width, height, glyphs }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyph for `codepoint`, `None` outside the printable ASCII range.
    pub fn get(&self, codepoint: u32) -> Option<&Glyph> {
        if !(FIRST..=LAST).contains(&codepoint) {
            return None;
        }
        self.glyphs.get((codepoint - FIRST) as usize)
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.get(ch as u32)
    }
}
