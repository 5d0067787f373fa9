//! Font sources and format detection.

use std::{fs, path::Path};

use crate::{bdf::BdfFont, glyph::Glyph, outline::OutlineFont, FontGenError, Result};

/// Anything that can produce fixed-size glyphs for single codepoints.
///
/// A missing glyph is never an error: implementors return a blank glyph of
/// the cell size instead.
pub trait GlyphSource {
    /// Cell `(width, height)` shared by every glyph of this source.
    fn cell_size(&self) -> (usize, usize);

    fn glyph(&self, codepoint: u32) -> Glyph;
}

/// Supported font file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    /// TrueType / OpenType outlines
    /// Extension: .ttf, .otf, .ttc
    Outline,

    /// Glyph Bitmap Distribution Format
    /// Extension: .bdf
    Bdf,
}

impl FontFormat {
    /// Try to detect the format from a file extension.
    ///
    /// Accepts extensions with or without leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "ttf" | "otf" | "ttc" => Some(Self::Outline),
            "bdf" => Some(Self::Bdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Outline => "TrueType/OpenType",
            Self::Bdf => "BDF",
        }
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An opened font. Owns the parsed font data for as long as one descriptor is processed.
pub enum FontSource {
    Outline(OutlineFont),
    Bitmap(BdfFont),
}

impl FontSource {
    /// Read and parse the font at `path`.
    ///
    /// # Errors
    ///
    /// Fails on unknown extensions, unreadable files and structurally invalid fonts.
    pub fn open(path: &Path) -> Result<Self> {
        let Some(format) = FontFormat::from_path(path) else {
            return Err(FontGenError::UnsupportedFormat { path: path.to_path_buf() });
        };
        log::info!("Loading {} font {}", format, path.display());

        match format {
            FontFormat::Outline => {
                let data = fs::read(path).map_err(|e| FontGenError::read_file(path, e))?;
                let font = OutlineFont::from_bytes(data).map_err(|message| FontGenError::InvalidOutlineFont {
                    path: path.to_path_buf(),
                    message: message.to_string(),
                })?;
                Ok(Self::Outline(font))
            }
            FontFormat::Bdf => {
                let text = fs::read_to_string(path).map_err(|e| FontGenError::read_file(path, e))?;
                Ok(Self::Bitmap(BdfFont::parse(&text)?))
            }
        }
    }
}
