//! Design file types: the on-disk form of a display plus its options.
//!
//! Only non-blank cells are stored. Each cell lists its eight pixel rows as
//! strings where `#` is on and `.` or a space is off:
//!
//! ```json
//! { "options": { "transmission": "i2c" },
//!   "cells": [ { "line": 0, "column": 5,
//!                "rows": [".#.#.", "#####", "#####", ".###.", "..#..", ".....", ".....", "....."] } ] }
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::types::{
    DisplayModel, GLYPH_COLUMNS, GLYPH_ROWS, GenerationOptions, GlyphBitmap, LCD_COLUMNS,
    LCD_LINES,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignFile {
    #[serde(default)]
    pub options: GenerationOptions,
    #[serde(default)]
    pub cells: Vec<CellSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSource {
    pub line: usize,
    pub column: usize,
    pub rows: Vec<PixelRow>,
}

/// One bitmap row. Written as a `#`/`.` string; also read back from a JSON
/// array of booleans or 0/1 numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRow(pub Vec<bool>);

impl fmt::Display for PixelRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &on in &self.0 {
            f.write_str(if on { "#" } else { "." })?;
        }
        Ok(())
    }
}

impl Serialize for PixelRow {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PixelRow {
    fn deserialize<D>(d: D) -> Result<PixelRow, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, SeqAccess, Visitor};

        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = PixelRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pixel row string like \"#..#.\" or an array of booleans")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<PixelRow, E> {
                v.chars()
                    .map(|c| match c {
                        '#' | '1' | 'X' | 'x' => Ok(true),
                        '.' | ' ' | '0' => Ok(false),
                        other => Err(E::custom(format!("invalid pixel character {other:?}"))),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(PixelRow)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PixelRow, A::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum PixelValue {
                    Flag(bool),
                    Number(u8),
                }

                let mut pixels = Vec::new();
                while let Some(value) = seq.next_element::<PixelValue>()? {
                    pixels.push(match value {
                        PixelValue::Flag(on) => on,
                        PixelValue::Number(n) => n != 0,
                    });
                }
                Ok(PixelRow(pixels))
            }
        }

        d.deserialize_any(RowVisitor)
    }
}

impl DesignFile {
    /// Capture the non-blank cells of a display.
    pub fn from_display(display: &DisplayModel, options: &GenerationOptions) -> Self {
        let cells = display
            .positions()
            .filter(|(_, _, glyph)| !glyph.is_blank())
            .map(|(line, column, glyph)| CellSource {
                line,
                column,
                rows: glyph.rows().iter().map(|row| PixelRow(row.to_vec())).collect(),
            })
            .collect();
        DesignFile {
            options: *options,
            cells,
        }
    }

    /// Rebuild the display, rejecting out-of-range positions, malformed
    /// bitmaps, duplicate cells and a zero scroll interval.
    pub fn to_display(&self) -> Result<(DisplayModel, GenerationOptions)> {
        ensure!(
            self.options.scroll_interval_ms > 0,
            "scroll_interval_ms must be positive"
        );

        let mut display = DisplayModel::new();
        let mut filled = [[false; LCD_COLUMNS]; LCD_LINES];

        for cell in &self.cells {
            let (line, column) = (cell.line, cell.column);
            if line >= LCD_LINES || column >= LCD_COLUMNS {
                bail!("cell ({line}, {column}) is outside the {LCD_COLUMNS}x{LCD_LINES} display");
            }
            if filled[line][column] {
                bail!("cell ({line}, {column}) is defined more than once");
            }
            filled[line][column] = true;

            let glyph = cell
                .to_glyph()
                .with_context(|| format!("Invalid bitmap for cell ({line}, {column})"))?;
            display.set_cell(line, column, glyph);
        }

        Ok((display, self.options))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl CellSource {
    fn to_glyph(&self) -> Result<GlyphBitmap> {
        ensure!(
            self.rows.len() == GLYPH_ROWS,
            "expected {GLYPH_ROWS} rows, found {}",
            self.rows.len()
        );
        let mut glyph = GlyphBitmap::blank();
        for (r, row) in self.rows.iter().enumerate() {
            ensure!(
                row.0.len() == GLYPH_COLUMNS,
                "row {r} has {} pixels, expected {GLYPH_COLUMNS}",
                row.0.len()
            );
            for (c, &on) in row.0.iter().enumerate() {
                glyph.set(r, c, on);
            }
        }
        Ok(glyph)
    }
}
