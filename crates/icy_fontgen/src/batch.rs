//! Batch driver: font descriptors in, header files out.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{FontDescriptor, GeneratorConfig},
    header,
    source::FontSource,
    table::GlyphTable,
    FontGenError, Result,
};

/// One written header.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub glyphs: usize,
}

/// A descriptor that could not be processed.
#[derive(Debug)]
pub struct Failure {
    pub source: PathBuf,
    pub error: FontGenError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Build every table of `descriptor`: one per configured size for outline
/// fonts, a single one at the declared bounding box for BDF fonts.
///
/// The font is opened once and released before returning.
///
/// # Errors
///
/// Structural problems of the source (unreadable, unparseable, missing
/// metadata) and invalid size/baseline settings.
pub fn build_tables(descriptor: &FontDescriptor, config: &GeneratorConfig) -> Result<Vec<GlyphTable>> {
    let settings = config.raster_settings();
    settings.validate()?;

    let name = font_name(&descriptor.path);
    let source = FontSource::open(&descriptor.path)?;

    match &source {
        FontSource::Outline(font) => {
            let sizes = config.sizes_for(descriptor);
            if sizes.is_empty() {
                return Err(FontGenError::NoSizes {
                    path: descriptor.path.clone(),
                });
            }
            let mut tables = Vec::with_capacity(sizes.len());
            for size in sizes {
                size.validate()?;
                tables.push(GlyphTable::build(name.clone(), &font.rasterizer(*size, settings)));
            }
            Ok(tables)
        }
        FontSource::Bitmap(font) => {
            if !descriptor.sizes.is_empty() {
                log::warn!("{}: target sizes are ignored for BDF fonts", descriptor.path.display());
            }
            Ok(vec![GlyphTable::build(name, font)])
        }
    }
}

/// Build all tables of `descriptor`, then write one header per table.
///
/// Nothing is written unless every table could be built, and headers
/// already written are removed again if a later one fails.
pub fn process(descriptor: &FontDescriptor, config: &GeneratorConfig) -> Result<Vec<Artifact>> {
    generate(descriptor, config, &mut HashSet::new()).map(|(artifacts, _)| artifacts)
}

/// Process descriptors one after another.
///
/// A failing descriptor is recorded and the batch continues, unless
/// `config.fail_fast` is set.
pub fn run(descriptors: &[FontDescriptor], config: &GeneratorConfig) -> BatchReport {
    run_with(descriptors, config, |_, _| {})
}

/// Like [`run`], handing the tables of every descriptor that was written
/// successfully to `on_written`.
pub fn run_with<F>(descriptors: &[FontDescriptor], config: &GeneratorConfig, mut on_written: F) -> BatchReport
where
    F: FnMut(&FontDescriptor, &[GlyphTable]),
{
    let mut report = BatchReport::default();
    let mut claimed = HashSet::new();
    for descriptor in descriptors {
        match generate(descriptor, config, &mut claimed) {
            Ok((artifacts, tables)) => {
                on_written(descriptor, &tables);
                report.artifacts.extend(artifacts);
            }
            Err(error) => {
                log::error!("{}: {}", descriptor.path.display(), error);
                report.failures.push(Failure {
                    source: descriptor.path.clone(),
                    error,
                });
                if config.fail_fast {
                    break;
                }
            }
        }
    }
    report
}

/// `claimed` holds the header paths already written in this batch.
fn generate(descriptor: &FontDescriptor, config: &GeneratorConfig, claimed: &mut HashSet<PathBuf>) -> Result<(Vec<Artifact>, Vec<GlyphTable>)> {
    let tables = build_tables(descriptor, config)?;

    let dir = output_dir(&descriptor.path, config.output_dir.as_deref());
    let paths = output_paths(&tables, &dir)?;
    if let Some(path) = paths.iter().find(|path| claimed.contains(*path)) {
        return Err(FontGenError::DuplicateOutput { path: path.clone() });
    }

    fs::create_dir_all(&dir).map_err(|e| FontGenError::write_file(&dir, e))?;
    let source_file = descriptor
        .path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();

    let artifacts = write_tables(&tables, &source_file, &dir)?;
    claimed.extend(paths);
    Ok((artifacts, tables))
}

/// Header paths of `tables`, failing if two tables map to the same file.
fn output_paths(tables: &[GlyphTable], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(tables.len());
    for table in tables {
        let path = header::header_path(table, dir);
        if paths.contains(&path) {
            return Err(FontGenError::DuplicateOutput { path });
        }
        paths.push(path);
    }
    Ok(paths)
}

/// Write one header per table. On failure the headers written so far are removed.
fn write_tables(tables: &[GlyphTable], source_file: &str, dir: &Path) -> Result<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = Vec::with_capacity(tables.len());
    for table in tables {
        match header::write_header(table, source_file, dir) {
            Ok(path) => {
                log::info!("Wrote {}", path.display());
                artifacts.push(Artifact {
                    path,
                    width: table.width(),
                    height: table.height(),
                    glyphs: table.len(),
                });
            }
            Err(error) => {
                for artifact in &artifacts {
                    if let Err(e) = fs::remove_file(&artifact.path) {
                        log::warn!("Could not remove {}: {e}", artifact.path.display());
                    }
                }
                return Err(error);
            }
        }
    }
    Ok(artifacts)
}

fn font_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "font".to_string())
}

fn output_dir(font_path: &Path, configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    match font_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
