//! BDF (Glyph Bitmap Distribution Format) reader.
//!
//! Only what the glyph table needs is read:
//! - `FONT` - font name (optional)
//! - `FONTBOUNDINGBOX W H xoff yoff` - the cell size of every glyph (required)
//! - `STARTCHAR` / `ENCODING n` / `BITMAP` / hex rows / `ENDCHAR` - glyph records
//!
//! Per-glyph `BBX` offsets are ignored: rows are bottom-aligned in the
//! declared cell, which keeps the baseline of short glyphs in place.

use std::collections::BTreeMap;

use crate::{
    glyph::{Glyph, FIRST, LAST, MAX_CELL_SIDE},
    source::GlyphSource,
    FontGenError, Result,
};

/// Parsed BDF font.
#[derive(Debug, Clone, PartialEq)]
pub struct BdfFont {
    pub name: Option<String>,
    /// Declared bounding box width in pixels
    pub width: usize,
    /// Declared bounding box height in pixels
    pub height: usize,
    /// Raw decoded scanlines per codepoint, top to bottom, 4 bits per hex digit.
    records: BTreeMap<u32, Vec<Vec<bool>>>,
}

#[derive(Default)]
struct Record {
    encoding: Option<i64>,
    rows: Vec<Vec<bool>>,
}

impl BdfFont {
    /// Parse BDF text.
    ///
    /// # Errors
    ///
    /// Fails on a missing or malformed `FONTBOUNDINGBOX`, a non-integer
    /// `ENCODING` or a scanline that isn't hexadecimal.
    pub fn parse(text: &str) -> Result<Self> {
        let mut name = None;
        let mut bbox = None;
        let mut records = BTreeMap::new();
        let mut current: Option<Record> = None;
        let mut in_bitmap = false;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();

            if in_bitmap {
                if keyword == "ENDCHAR" {
                    in_bitmap = false;
                    if let Some(record) = current.take() {
                        finish_record(&mut records, record);
                    }
                    continue;
                }
                let bits = hex_bits(line).ok_or_else(|| FontGenError::InvalidScanline {
                    line: line_no,
                    value: line.to_string(),
                })?;
                if let Some(record) = current.as_mut() {
                    record.rows.push(bits);
                }
                continue;
            }

            match keyword {
                "FONT" => name = Some(rest.to_string()),
                "FONTBOUNDINGBOX" => bbox = Some(parse_bounding_box(rest, line_no)?),
                "STARTCHAR" => current = Some(Record::default()),
                "ENCODING" => {
                    if let Some(record) = current.as_mut() {
                        let value = rest.split_whitespace().next().unwrap_or_default();
                        let encoding = value.parse::<i64>().map_err(|_| FontGenError::InvalidEncoding {
                            line: line_no,
                            value: rest.to_string(),
                        })?;
                        record.encoding = Some(encoding);
                    }
                }
                "BITMAP" => in_bitmap = current.is_some(),
                "ENDCHAR" => {
                    if let Some(record) = current.take() {
                        finish_record(&mut records, record);
                    }
                }
                _ => {}
            }
        }

        if let Some(record) = current.take() {
            log::warn!("BDF: unterminated glyph record at end of file");
            finish_record(&mut records, record);
        }

        let Some((width, height)) = bbox else {
            return Err(FontGenError::MissingBoundingBox);
        };

        Ok(Self { name, width, height, records })
    }

    /// Number of records in the printable ASCII range.
    pub fn glyph_count(&self) -> usize {
        self.records.len()
    }

    pub fn has_glyph(&self, codepoint: u32) -> bool {
        self.records.contains_key(&codepoint)
    }

    /// Scanlines of `codepoint` fitted to the bounding box, row-major and
    /// bottom-aligned. `None` if the font has no record for it.
    pub fn normalized_rows(&self, codepoint: u32) -> Option<Vec<Vec<bool>>> {
        self.records.get(&codepoint).map(|rows| normalize_rows(rows, self.width, self.height))
    }
}

impl GlyphSource for BdfFont {
    fn cell_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn glyph(&self, codepoint: u32) -> Glyph {
        match self.normalized_rows(codepoint) {
            Some(rows) => Glyph::from_rows(codepoint, self.width, self.height, &rows),
            None => {
                log::debug!("BDF: no record for {codepoint}, using blank glyph");
                Glyph::blank(codepoint, self.width, self.height)
            }
        }
    }
}

fn finish_record(records: &mut BTreeMap<u32, Vec<Vec<bool>>>, record: Record) {
    let Some(encoding) = record.encoding else {
        log::debug!("BDF: skipping glyph record without ENCODING");
        return;
    };
    if encoding < FIRST as i64 || encoding > LAST as i64 {
        return;
    }
    let codepoint = encoding as u32;
    if records.contains_key(&codepoint) {
        log::warn!("BDF: duplicate record for {codepoint}, keeping the first one");
        return;
    }
    records.insert(codepoint, record.rows);
}

fn parse_bounding_box(value: &str, line: usize) -> Result<(usize, usize)> {
    let invalid = || FontGenError::InvalidBoundingBox {
        line,
        value: value.to_string(),
    };
    let mut parts = value.split_whitespace();
    let width = parts.next().and_then(|w| w.parse::<usize>().ok()).ok_or_else(invalid)?;
    let height = parts.next().and_then(|h| h.parse::<usize>().ok()).ok_or_else(invalid)?;
    if width == 0 || height == 0 || width > MAX_CELL_SIDE || height > MAX_CELL_SIDE {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Decode a hex string to its big-endian bit sequence (MSB of the first digit first).
fn hex_bits(hex: &str) -> Option<Vec<bool>> {
    let mut bits = Vec::with_capacity(hex.len() * 4);
    for ch in hex.chars() {
        let nibble = ch.to_digit(16)?;
        for shift in (0..4).rev() {
            bits.push(nibble & (1 << shift) != 0);
        }
    }
    Some(bits)
}

/// Decode one scanline and keep its leftmost `width` bits, zero-padding short rows.
pub fn decode_scanline(hex: &str, width: usize) -> Option<Vec<bool>> {
    hex_bits(hex.trim()).map(|bits| fit_row(&bits, width))
}

fn fit_row(bits: &[bool], width: usize) -> Vec<bool> {
    let mut row: Vec<bool> = bits.iter().copied().take(width).collect();
    row.resize(width, false);
    row
}

/// Fit rows to `width` and to exactly `height` rows: short glyphs get blank
/// rows on top, tall glyphs keep their bottommost `height` rows.
pub fn normalize_rows(rows: &[Vec<bool>], width: usize, height: usize) -> Vec<Vec<bool>> {
    let skip = rows.len().saturating_sub(height);
    let pad = height.saturating_sub(rows.len());

    let mut result = vec![vec![false; width]; pad];
    result.extend(rows[skip..].iter().map(|row| fit_row(row, width)));
    result
}
