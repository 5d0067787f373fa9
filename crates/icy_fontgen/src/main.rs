use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use flexi_logger::Logger;
use icy_fontgen::{batch, FontDescriptor, GeneratorConfig, GlyphTable, RenderMode, TargetSize};

#[derive(Parser, Debug)]
#[command(version, about = "Generates fixed-size ASCII glyph tables (C headers) from TTF/OTF and BDF fonts.", long_about = None)]
pub struct Args {
    /// Font files to convert (.ttf, .otf, .ttc, .bdf)
    #[arg(value_name = "FONTS")]
    fonts: Vec<PathBuf>,

    /// Outline target size as WxH@SIZE, repeatable (default 32x64@62)
    #[arg(short, long = "size", value_name = "WxH@SIZE")]
    sizes: Vec<TargetSize>,

    /// Coverage threshold 0-255: higher = thinner strokes, lower = bolder
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Baseline position as a fraction of the cell height, in (0, 1]
    #[arg(short, long)]
    baseline: Option<f32>,

    /// Render outlines 1 bit per pixel instead of thresholding coverage
    #[arg(long, default_value_t = false)]
    mono: bool,

    /// Directory for the generated headers (default: next to each font)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// TOML config with settings and a [[fonts]] list
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop at the first font that fails
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Print these characters of every generated table as ASCII art
    #[arg(long, value_name = "TEXT")]
    preview: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(GeneratorConfig, Option<String>)> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if !self.sizes.is_empty() {
            config.sizes = self.sizes;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(baseline) = self.baseline {
            config.baseline = baseline;
        }
        if self.mono {
            config.mode = RenderMode::Monochrome;
        }
        if self.output_dir.is_some() {
            config.output_dir = self.output_dir;
        }
        config.fail_fast |= self.fail_fast;
        config.fonts.extend(self.fonts.into_iter().map(FontDescriptor::new));

        Ok((config, self.preview))
    }
}

fn print_table_preview(table: &GlyphTable, text: &str) {
    println!("{} {}x{}:", table.name, table.width(), table.height());
    for ch in text.chars() {
        match table.glyph(ch) {
            Some(glyph) => println!("'{ch}'\n{glyph}"),
            None => println!("'{ch}' is outside the generated range"),
        }
    }
}

/// Run the batch. Returns `false` when there is nothing to do (usage is
/// printed) or when any font failed.
fn execute(config: &GeneratorConfig, preview: Option<&str>) -> anyhow::Result<bool> {
    if config.fonts.is_empty() {
        Args::command().print_help()?;
        return Ok(false);
    }

    log::info!("Starting icy_fontgen {}", env!("CARGO_PKG_VERSION"));

    let report = batch::run_with(&config.fonts, config, |_, tables| {
        if let Some(text) = preview {
            for table in tables {
                print_table_preview(table, text);
            }
        }
    });
    for artifact in &report.artifacts {
        println!("Generated {} ({} glyphs)", artifact.path.display(), artifact.glyphs);
    }
    for failure in &report.failures {
        eprintln!("Failed {}: {}", failure.source.display(), failure.error);
    }
    Ok(report.is_success())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let (config, preview) = args.into_config()?;
    if execute(&config, preview.as_deref())? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
