use std::{
    fs,
    path::{Path, PathBuf},
};

use icy_fontgen::{batch, bdf::BdfFont, FontDescriptor, FontGenError, GeneratorConfig, GlyphTable, COUNT};
use pretty_assertions::assert_eq;

const A_ROWS: [&str; 16] = [
    "00", "00", "10", "38", "6C", "C6", "C6", "FE", "C6", "C6", "C6", "C6", "00", "00", "00", "00",
];

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("icy_fontgen_{}_{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn bdf_8x16() -> String {
    let mut text = String::from("STARTFONT 2.1\nFONT -test-fixed-medium-r-normal--16\nSIZE 16 75 75\nFONTBOUNDINGBOX 8 16 0 -4\nCHARS 2\n");
    text.push_str("STARTCHAR A\nENCODING 65\nSWIDTH 500 0\nDWIDTH 8 0\nBBX 8 16 0 -4\nBITMAP\n");
    for row in A_ROWS {
        text.push_str(row);
        text.push('\n');
    }
    text.push_str("ENDCHAR\n");
    // 10 rows only, must end up bottom-aligned
    text.push_str("STARTCHAR underscore\nENCODING 95\nBITMAP\n00\n00\n00\n00\n00\n00\n00\n00\n00\nFF\nENDCHAR\nENDFONT\n");
    text
}

fn write_font(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// The 0/1 rows of glyph block `index` in a generated header.
fn glyph_block(header: &str, index: usize) -> Vec<Vec<u8>> {
    let block = header.split("  /* '").nth(index + 1).unwrap();
    block
        .lines()
        .skip(1)
        .take_while(|line| line.trim_start().starts_with('{'))
        .map(|line| {
            line.trim()
                .trim_start_matches('{')
                .trim_end_matches("},")
                .split(',')
                .map(|v| v.parse::<u8>().unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn test_bdf_end_to_end() {
    let dir = test_dir("end_to_end");
    let font = write_font(&dir, "fixed.bdf", &bdf_8x16());

    let artifacts = batch::process(&FontDescriptor::new(&font), &GeneratorConfig::default()).unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].path, dir.join("fixed_font8x16.h"));
    assert_eq!((artifacts[0].width, artifacts[0].height, artifacts[0].glyphs), (8, 16, 95));

    let header = fs::read_to_string(&artifacts[0].path).unwrap();
    assert!(header.contains("#define FONT8X16_COUNT (FONT8X16_LAST - FONT8X16_FIRST + 1)"));
    assert!(header.contains("#define FONT8X16_FIRST 32\n#define FONT8X16_LAST 126\n"));
    assert!(header.contains("static const uint8_t font8x16[FONT8X16_COUNT][8][16] = {"));
    assert_eq!(header.matches("  /* '").count(), COUNT);

    // entry 33 = 'A', column-major: block[x][y] = row y, bit x
    let a = glyph_block(&header, 65 - 32);
    assert_eq!(a.len(), 8);
    for (x, column) in a.iter().enumerate() {
        let expected: Vec<u8> = A_ROWS
            .iter()
            .map(|row| (u8::from_str_radix(row, 16).unwrap() >> (7 - x)) & 1)
            .collect();
        assert_eq!(column, &expected, "column {x}");
    }

    // entry 0 = space, not in the font
    let space = glyph_block(&header, 0);
    assert_eq!(space, vec![vec![0u8; 16]; 8]);

    // underscore: 10 source rows, ink on the last one -> bottom row of the cell
    let underscore = glyph_block(&header, 95 - 32);
    for column in &underscore {
        let mut expected = vec![0u8; 16];
        expected[15] = 1;
        assert_eq!(column, &expected);
    }
}

#[test]
fn test_height_normalization_via_table() {
    let font = BdfFont::parse(&bdf_8x16()).unwrap();
    let rows = font.normalized_rows(95).unwrap();
    assert_eq!(rows.len(), 16);
    assert!(rows[..6].iter().all(|row| row.iter().all(|&p| !p)));
    assert_eq!(rows[15], vec![true; 8]);

    let table = GlyphTable::build("fixed", &font);
    assert_eq!(table.len(), 95);
    for glyph in table.glyphs() {
        assert_eq!((glyph.width(), glyph.height()), (8, 16));
        if glyph.codepoint != 65 && glyph.codepoint != 95 {
            assert!(glyph.is_empty(), "codepoint {}", glyph.codepoint);
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let dir = test_dir("deterministic");
    let font = write_font(&dir, "fixed.bdf", &bdf_8x16());
    let descriptor = FontDescriptor::new(&font);
    let config = GeneratorConfig::default();

    let first = batch::process(&descriptor, &config).unwrap();
    let first_bytes = fs::read(&first[0].path).unwrap();
    let second = batch::process(&descriptor, &config).unwrap();
    let second_bytes = fs::read(&second[0].path).unwrap();

    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_failure_isolation() {
    let dir = test_dir("isolation");
    let broken = write_font(&dir, "broken.bdf", "STARTFONT 2.1\nSTARTCHAR A\nENCODING 65\nBITMAP\nFF\nENDCHAR\nENDFONT\n");
    let good = write_font(&dir, "good.bdf", &bdf_8x16());
    let descriptors = vec![FontDescriptor::new(&broken), FontDescriptor::new(&good)];

    let report = batch::run(&descriptors, &GeneratorConfig::default());
    assert!(!report.is_success());
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].path, dir.join("good_font8x16.h"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, broken);
    assert!(matches!(report.failures[0].error, FontGenError::MissingBoundingBox));

    // nothing is written for the broken source
    let written: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".h"))
        .collect();
    assert_eq!(written, vec!["good_font8x16.h".to_string()]);
}

#[test]
fn test_fail_fast() {
    let dir = test_dir("fail_fast");
    let broken = write_font(&dir, "broken.bdf", "FONTBOUNDINGBOX 8 2 0 0\nSTARTCHAR A\nENCODING 65\nBITMAP\nXY\nENDCHAR\n");
    let good = write_font(&dir, "good.bdf", &bdf_8x16());
    let descriptors = vec![FontDescriptor::new(&broken), FontDescriptor::new(&good)];

    let config = GeneratorConfig {
        fail_fast: true,
        ..Default::default()
    };
    let report = batch::run(&descriptors, &config);
    assert!(report.artifacts.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, FontGenError::InvalidScanline { line: 5, .. }));
    assert!(!dir.join("good_font8x16.h").exists());
}

#[test]
fn test_tables_handed_out_only_for_written_fonts() {
    let dir = test_dir("run_with");
    let broken = write_font(&dir, "broken.bdf", "FONTBOUNDINGBOX 8 2 0 0\nSTARTCHAR A\nENCODING 65\nBITMAP\nXY\nENDCHAR\n");
    let good = write_font(&dir, "good.bdf", &bdf_8x16());
    let descriptors = vec![FontDescriptor::new(&broken), FontDescriptor::new(&good)];

    let mut seen = Vec::new();
    let report = batch::run_with(&descriptors, &GeneratorConfig::default(), |descriptor, tables| {
        seen.push((descriptor.path.clone(), tables.len(), tables[0].glyph('A').unwrap().ink_count()));
    });
    assert_eq!(report.failures.len(), 1);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, good);
    assert_eq!(seen[0].1, 1);
    assert!(seen[0].2 > 0);

    // fail-fast stops before the good font is opened at all
    let config = GeneratorConfig {
        fail_fast: true,
        ..Default::default()
    };
    let mut calls = 0;
    let report = batch::run_with(&descriptors, &config, |_, _| calls += 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(calls, 0);
}

#[test]
fn test_same_stem_into_shared_output_dir() {
    let dir = test_dir("same_stem");
    fs::create_dir_all(dir.join("a")).unwrap();
    fs::create_dir_all(dir.join("b")).unwrap();
    let first = write_font(&dir.join("a"), "fixed.bdf", &bdf_8x16());
    let second = write_font(&dir.join("b"), "fixed.bdf", &bdf_8x16());
    let out = dir.join("include");
    let config = GeneratorConfig {
        output_dir: Some(out.clone()),
        ..Default::default()
    };

    let report = batch::run(&[FontDescriptor::new(&first), FontDescriptor::new(&second)], &config);
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].path, out.join("fixed_font8x16.h"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, second);
    match &report.failures[0].error {
        FontGenError::DuplicateOutput { path } => assert_eq!(path, &out.join("fixed_font8x16.h")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_output_dir_and_bad_inputs() {
    let dir = test_dir("output_dir");
    let font = write_font(&dir, "fixed.bdf", &bdf_8x16());
    let out = dir.join("include");
    let config = GeneratorConfig {
        output_dir: Some(out.clone()),
        ..Default::default()
    };

    let descriptors = vec![
        FontDescriptor::new(&font),
        FontDescriptor::new(dir.join("missing.bdf")),
        FontDescriptor::new(dir.join("font.pcf")),
    ];
    let report = batch::run(&descriptors, &config);
    assert_eq!(report.artifacts.len(), 1);
    assert!(out.join("fixed_font8x16.h").exists());
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0].error, FontGenError::ReadFile { .. }));
    assert!(matches!(report.failures[1].error, FontGenError::UnsupportedFormat { .. }));
}

#[test]
fn test_invalid_outline_font() {
    let dir = test_dir("invalid_outline");
    let font = write_font(&dir, "garbage.ttf", "this is not a font");
    let report = batch::run(&[FontDescriptor::new(&font)], &GeneratorConfig::default());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, FontGenError::InvalidOutlineFont { .. }));
    assert!(!dir.join("garbage_font32x64.h").exists());
}

fn system_ttf() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

#[test]
fn test_outline_multiple_sizes() {
    let Some(font) = system_ttf() else {
        return;
    };
    let dir = test_dir("outline_sizes");
    let mut descriptor = FontDescriptor::new(&font);
    descriptor.sizes = vec!["8x16@16".parse().unwrap(), "16x32@30".parse().unwrap()];
    let config = GeneratorConfig {
        output_dir: Some(dir.clone()),
        ..Default::default()
    };

    let tables = batch::build_tables(&descriptor, &config).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!((tables[0].width(), tables[0].height()), (8, 16));
    assert_eq!((tables[1].width(), tables[1].height()), (16, 32));
    for table in &tables {
        assert_eq!(table.len(), COUNT);
        assert!(table.glyph(' ').unwrap().is_empty());
        assert!(!table.glyph('M').unwrap().is_empty());
    }

    let artifacts = batch::process(&descriptor, &config).unwrap();
    assert_eq!(artifacts.len(), 2);
    for artifact in &artifacts {
        let header = fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(header.matches("  /* '").count(), COUNT);
    }
}
