//! Glyph table generator.
//!
//! Turns a TTF/OTF or BDF font into a fixed-size 1 bit per pixel table of the
//! printable ASCII characters (32..=126) and writes it as a C header, for
//! display code that can't render fonts at runtime.
//!
//! ```no_run
//! use icy_fontgen::{batch, FontDescriptor, GeneratorConfig};
//!
//! let config = GeneratorConfig::default();
//! let report = batch::run(&[FontDescriptor::new("font.ttf")], &config);
//! assert!(report.is_success());
//! ```

pub mod batch;
pub mod bdf;
pub mod config;
pub mod glyph;
pub mod header;
pub mod outline;
pub mod source;
pub mod table;

mod error;
pub use error::*;

pub use config::{FontDescriptor, GeneratorConfig, RasterSettings, RenderMode, TargetSize};
pub use glyph::{Glyph, COUNT, FIRST, LAST, MAX_CELL_SIDE};
pub use source::{FontFormat, FontSource, GlyphSource};
pub use table::GlyphTable;
