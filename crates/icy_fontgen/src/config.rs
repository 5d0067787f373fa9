use std::{fmt::Display, fs, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{glyph::MAX_CELL_SIDE, FontGenError, Result};

pub const DEFAULT_THRESHOLD: u8 = 250;
pub const DEFAULT_BASELINE: f32 = 0.85;

/// How the outline rasterizer turns rendered coverage into ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// 8-bit coverage canvas, ink iff coverage >= threshold.
    #[default]
    Grayscale,
    /// 1-bit canvas, ink iff the pixel holds the set value.
    Monochrome,
}

/// Rasterization constants, passed to the rasterizer at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// 0-255: higher = thinner strokes, lower = bolder
    pub threshold: u8,
    /// Baseline position as a fraction of the cell height
    pub baseline: f32,
    pub mode: RenderMode,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            baseline: DEFAULT_BASELINE,
            mode: RenderMode::Grayscale,
        }
    }
}

impl RasterSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.baseline > 0.0 && self.baseline <= 1.0) {
            return Err(FontGenError::InvalidBaseline(self.baseline));
        }
        Ok(())
    }

    /// Row the typographic baseline is anchored to.
    pub fn baseline_row(&self, cell_height: usize) -> i32 {
        (cell_height as f32 * self.baseline).floor() as i32
    }
}

/// Target cell for an outline font: `width` x `height` pixels, rendered at `size` px per em.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: usize,
    pub height: usize,
    pub size: f32,
}

impl TargetSize {
    pub fn new(width: usize, height: usize, size: f32) -> Self {
        Self { width, height, size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FontGenError::invalid_size(self.to_string(), "width and height must be non-zero"));
        }
        if self.width > MAX_CELL_SIDE || self.height > MAX_CELL_SIDE {
            return Err(FontGenError::invalid_size(
                self.to_string(),
                format!("width and height must be at most {MAX_CELL_SIDE}"),
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(FontGenError::invalid_size(self.to_string(), "render size must be positive"));
        }
        Ok(())
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::new(32, 64, 62.0)
    }
}

impl Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}@{}", self.width, self.height, self.size)
    }
}

/// Parses `WxH@S` (e.g. `32x64@62`). Without `@S` the render size equals the height.
impl FromStr for TargetSize {
    type Err = FontGenError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (dims, size) = match s.split_once('@') {
            Some((dims, size)) => (dims, Some(size)),
            None => (s, None),
        };
        let Some((w, h)) = dims.split_once(['x', 'X']) else {
            return Err(FontGenError::invalid_size(s, "expected WxH@SIZE"));
        };
        let width = w.trim().parse::<usize>().map_err(|e| FontGenError::invalid_size(s, e.to_string()))?;
        let height = h.trim().parse::<usize>().map_err(|e| FontGenError::invalid_size(s, e.to_string()))?;
        let size = match size {
            Some(size) => size.trim().parse::<f32>().map_err(|e| FontGenError::invalid_size(s, e.to_string()))?,
            None => height as f32,
        };
        let result = Self::new(width, height, size);
        result.validate()?;
        Ok(result)
    }
}

/// One font source to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub path: PathBuf,
    /// Outline target sizes; empty = use the configured defaults. Ignored for bitmap fonts.
    #[serde(default)]
    pub sizes: Vec<TargetSize>,
}

impl FontDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sizes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    #[serde(default = "default_baseline")]
    pub baseline: f32,

    #[serde(default)]
    pub mode: RenderMode,

    #[serde(default = "default_sizes")]
    pub sizes: Vec<TargetSize>,

    #[serde(default)]
    pub fonts: Vec<FontDescriptor>,

    /// Where headers go; `None` writes next to each font.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub fail_fast: bool,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_baseline() -> f32 {
    DEFAULT_BASELINE
}

fn default_sizes() -> Vec<TargetSize> {
    vec![TargetSize::default()]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            baseline: DEFAULT_BASELINE,
            mode: RenderMode::default(),
            sizes: default_sizes(),
            fonts: Vec::new(),
            output_dir: None,
            fail_fast: false,
        }
    }
}

impl GeneratorConfig {
    /// Load a TOML config file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or isn't valid TOML for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FontGenError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn raster_settings(&self) -> RasterSettings {
        RasterSettings {
            threshold: self.threshold,
            baseline: self.baseline,
            mode: self.mode,
        }
    }

    /// Outline sizes for `descriptor`: its own list, or the configured defaults.
    pub fn sizes_for<'a>(&'a self, descriptor: &'a FontDescriptor) -> &'a [TargetSize] {
        if descriptor.sizes.is_empty() {
            &self.sizes
        } else {
            &descriptor.sizes
        }
    }
}
