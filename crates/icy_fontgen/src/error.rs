//! Unified error types for icy_fontgen

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for glyph table generation.
///
/// Every variant except the configuration ones is structural: it aborts the
/// affected font source but never a single glyph lookup.
#[derive(Debug, Error)]
pub enum FontGenError {
    // === I/O Errors ===
    #[error("Failed to read file '{path}': {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },

    // === Source Errors ===
    #[error("Unsupported font format: '{path}' (expected .ttf, .otf, .ttc or .bdf)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid outline font '{path}': {message}")]
    InvalidOutlineFont { path: PathBuf, message: String },

    // === BDF Errors ===
    #[error("BDF: missing FONTBOUNDINGBOX declaration")]
    MissingBoundingBox,

    #[error("BDF line {line}: malformed FONTBOUNDINGBOX '{value}'")]
    InvalidBoundingBox { line: usize, value: String },

    #[error("BDF line {line}: invalid ENCODING '{value}'")]
    InvalidEncoding { line: usize, value: String },

    #[error("BDF line {line}: scanline '{value}' is not hexadecimal")]
    InvalidScanline { line: usize, value: String },

    // === Configuration Errors ===
    #[error("Invalid size '{value}': {message}")]
    InvalidSize { value: String, message: String },

    #[error("Baseline fraction must be in (0, 1], got {0}")]
    InvalidBaseline(f32),

    #[error("No target sizes configured for outline font '{path}'")]
    NoSizes { path: PathBuf },

    #[error("Output '{path}' is already produced by another table of this batch")]
    DuplicateOutput { path: PathBuf },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for icy_fontgen operations
pub type Result<T> = std::result::Result<T, FontGenError>;

// === Convenience constructors ===
impl FontGenError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile { path: path.into(), source }
    }

    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile { path: path.into(), source }
    }

    pub fn invalid_size(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSize {
            value: value.into(),
            message: message.into(),
        }
    }
}
