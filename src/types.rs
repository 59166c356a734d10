//! Shared boundary types for the LCD Glyph Studio.
//!
//! This module defines the data contracts between the editor and the engine:
//! - Editor → Engine: `DisplayModel` plus `GenerationOptions`
//! - Engine → Editor: `GeneratedCode`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixel rows in one character cell.
pub const GLYPH_ROWS: usize = 8;
/// Pixel columns in one character cell.
pub const GLYPH_COLUMNS: usize = 5;
/// Character lines on the display.
pub const LCD_LINES: usize = 2;
/// Character columns on each display line.
pub const LCD_COLUMNS: usize = 16;

pub type Pixel = bool;

// ---------------------------------------------------------------------------
// Bitmap model
// ---------------------------------------------------------------------------

/// One 8x5 character bitmap. Equality is pixel content equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    rows: [[Pixel; GLYPH_COLUMNS]; GLYPH_ROWS],
}

impl GlyphBitmap {
    pub const fn blank() -> Self {
        GlyphBitmap {
            rows: [[false; GLYPH_COLUMNS]; GLYPH_ROWS],
        }
    }

    pub const fn from_rows(rows: [[Pixel; GLYPH_COLUMNS]; GLYPH_ROWS]) -> Self {
        GlyphBitmap { rows }
    }

    pub fn rows(&self) -> &[[Pixel; GLYPH_COLUMNS]; GLYPH_ROWS] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Pixel> {
        self.rows.get(row)?.get(column).copied()
    }

    /// Set a pixel. Returns `false` (and changes nothing) when out of range.
    pub fn set(&mut self, row: usize, column: usize, on: Pixel) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(pixel) => {
                *pixel = on;
                true
            }
            None => false,
        }
    }

    /// Flip a pixel and return its new state, or `None` when out of range.
    pub fn toggle(&mut self, row: usize, column: usize) -> Option<Pixel> {
        let pixel = self.rows.get_mut(row)?.get_mut(column)?;
        *pixel = !*pixel;
        Some(*pixel)
    }

    pub fn clear(&mut self) {
        *self = Self::blank();
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|&p| !p)
    }

    /// Number of pixels switched on.
    pub fn active_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&p| p).count()
    }
}

/// The whole 16x2 display. Every cell is always a complete bitmap; a blank
/// cell is an all-off bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    cells: [[GlyphBitmap; LCD_COLUMNS]; LCD_LINES],
}

impl Default for DisplayModel {
    fn default() -> Self {
        DisplayModel {
            cells: [[GlyphBitmap::blank(); LCD_COLUMNS]; LCD_LINES],
        }
    }
}

impl DisplayModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, line: usize, column: usize) -> Option<&GlyphBitmap> {
        self.cells.get(line)?.get(column)
    }

    pub fn cell_mut(&mut self, line: usize, column: usize) -> Option<&mut GlyphBitmap> {
        self.cells.get_mut(line)?.get_mut(column)
    }

    /// Replace a whole cell. Returns `false` when the position is out of range.
    pub fn set_cell(&mut self, line: usize, column: usize, glyph: GlyphBitmap) -> bool {
        match self.cell_mut(line, column) {
            Some(cell) => {
                *cell = glyph;
                true
            }
            None => false,
        }
    }

    /// All 32 positions in scan order: line 0 columns 0..16, then line 1.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, &GlyphBitmap)> {
        self.cells.iter().enumerate().flat_map(|(line, row)| {
            row.iter()
                .enumerate()
                .map(move |(column, glyph)| (line, column, glyph))
        })
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(GlyphBitmap::is_blank)
    }
}

// ---------------------------------------------------------------------------
// Generation options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    #[default]
    Parallel,
    I2c,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    #[default]
    Hex,
    Binary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Content travels from right to left.
    #[default]
    Left,
    Right,
}

/// Cadence used by naive scrolling, regardless of the configured interval.
pub const NAIVE_SCROLL_INTERVAL_MS: u32 = 300;
pub const DEFAULT_SCROLL_INTERVAL_MS: u32 = 300;

fn default_interval() -> u32 {
    DEFAULT_SCROLL_INTERVAL_MS
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub transmission: Transmission,
    #[serde(default)]
    pub number_format: NumberFormat,
    #[serde(default, skip_serializing_if = "is_false")]
    pub scrolling_enabled: bool,
    /// Only rewrite the slots that changed since the previous frame.
    #[serde(default, skip_serializing_if = "is_false")]
    pub buffered_scroll: bool,
    #[serde(default)]
    pub scroll_direction: ScrollDirection,
    #[serde(default = "default_interval")]
    pub scroll_interval_ms: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            transmission: Transmission::default(),
            number_format: NumberFormat::default(),
            scrolling_enabled: false,
            buffered_scroll: false,
            scroll_direction: ScrollDirection::default(),
            scroll_interval_ms: DEFAULT_SCROLL_INTERVAL_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------

/// The finished sketch text. Regenerated wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode(String);

impl GeneratedCode {
    pub fn new(text: String) -> Self {
        GeneratedCode(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.0.lines()
    }
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
