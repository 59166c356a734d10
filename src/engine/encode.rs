//! Byte encoder for glyph rows.
//!
//! Each 5-pixel row packs into the low five bits of a byte, leftmost column
//! in bit 4. The top three bits are always zero.

use crate::types::{GLYPH_COLUMNS, GLYPH_ROWS, GlyphBitmap, NumberFormat, Pixel};

pub fn encode_row(row: &[Pixel; GLYPH_COLUMNS]) -> u8 {
    row.iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .fold(0u8, |byte, (column, _)| byte | 1 << (GLYPH_COLUMNS - 1 - column))
}

/// Render a byte as a sketch literal: `0x1F` or `0b00011111`.
pub fn format_byte(value: u8, format: NumberFormat) -> String {
    match format {
        NumberFormat::Hex => format!("0x{value:02X}"),
        NumberFormat::Binary => format!("0b{value:08b}"),
    }
}

/// The eight row literals of a glyph, top row first.
pub fn encode_glyph(glyph: &GlyphBitmap, format: NumberFormat) -> [String; GLYPH_ROWS] {
    let rows = *glyph.rows();
    rows.map(|row| format_byte(encode_row(&row), format))
}
