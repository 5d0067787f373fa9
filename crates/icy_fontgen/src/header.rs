//! C header output.
//!
//! A table becomes a `static const uint8_t fontWxH[COUNT][W][H]` array with
//! one `{0,1,...}` row per glyph column, preceded by the usual include guard
//! and size defines. The output has no timestamps, so identical tables give
//! identical files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    glyph::{Glyph, FIRST, LAST},
    table::GlyphTable,
    FontGenError, Result,
};

/// Macro prefix, e.g. `FONT8X16`.
pub fn macro_prefix(table: &GlyphTable) -> String {
    format!("FONT{}X{}", table.width(), table.height())
}

/// File name of the header for `table`: `<name>_font<W>x<H>.h`.
pub fn file_name(table: &GlyphTable) -> String {
    format!("{}_font{}x{}.h", table.name, table.width(), table.height())
}

/// Render `table` as C header text. `source_file` only appears in the leading comment.
pub fn render_header(table: &GlyphTable, source_file: &str) -> String {
    let (w, h) = (table.width(), table.height());
    let m = macro_prefix(table);

    let mut out = String::new();
    out.push_str(&format!("/* Auto-generated {w}x{h} font from {source_file} */\n"));
    out.push_str(&format!("#ifndef {m}_H\n#define {m}_H\n\n#include <stdint.h>\n\n"));
    out.push_str(&format!("#define {m}_WIDTH {w}\n"));
    out.push_str(&format!("#define {m}_HEIGHT {h}\n"));
    out.push_str(&format!("#define {m}_FIRST {FIRST}\n"));
    out.push_str(&format!("#define {m}_LAST {LAST}\n"));
    out.push_str(&format!("#define {m}_COUNT ({m}_LAST - {m}_FIRST + 1)\n\n"));
    out.push_str(&format!("static const uint8_t font{w}x{h}[{m}_COUNT][{w}][{h}] = {{\n"));

    for glyph in table.glyphs() {
        push_glyph(&mut out, glyph);
    }

    out.push_str("};\n\n#endif\n");
    out
}

fn push_glyph(out: &mut String, glyph: &Glyph) {
    out.push_str(&format!("  /* '{}' */ {{\n", escape_char(glyph.ch())));
    for column in glyph.columns() {
        let row: Vec<&str> = column.iter().map(|&p| if p { "1" } else { "0" }).collect();
        out.push_str(&format!("    {{{}}},\n", row.join(",")));
    }
    out.push_str("  },\n");
}

/// Escape a character for a `'c'` comment.
pub fn escape_char(ch: char) -> String {
    match ch {
        '\\' | '\'' => format!("\\{ch}"),
        _ => ch.to_string(),
    }
}

/// Where the header for `table` goes inside `dir`.
pub fn header_path(table: &GlyphTable, dir: &Path) -> PathBuf {
    dir.join(file_name(table))
}

/// Render `table` and write it to `dir`, returning the written path.
///
/// The text is fully rendered before the file is created.
pub fn write_header(table: &GlyphTable, source_file: &str, dir: &Path) -> Result<PathBuf> {
    let text = render_header(table, source_file);
    let path = header_path(table, dir);
    fs::write(&path, text).map_err(|e| FontGenError::write_file(&path, e))?;
    Ok(path)
}
