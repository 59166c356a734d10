//! Character deduplication.
//!
//! Scans the display in row-major order and gives every distinct non-blank
//! bitmap a small index in order of first appearance. Bit-identical cells
//! share one index.

use std::collections::HashMap;

use crate::types::{DisplayModel, GlyphBitmap, LCD_COLUMNS, LCD_LINES};

/// Distinct non-blank glyphs, indexed by position in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: Vec<GlyphBitmap>,
}

impl GlyphTable {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<&GlyphBitmap> {
        self.glyphs.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &GlyphBitmap)> {
        self.glyphs.iter().enumerate().map(|(i, g)| (i as u8, g))
    }
}

/// For each display position, the glyph index drawn there (`None` = blank).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementMap {
    slots: [[Option<u8>; LCD_COLUMNS]; LCD_LINES],
}

impl PlacementMap {
    pub fn get(&self, line: usize, column: usize) -> Option<u8> {
        *self.slots.get(line)?.get(column)?
    }

    /// Non-blank positions in scan order as `(line, column, glyph index)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.slots.iter().enumerate().flat_map(|(line, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(column, slot)| slot.map(|index| (line, column, index)))
        })
    }
}

/// Build the glyph table and placement map for a display.
pub fn build_glyph_table(display: &DisplayModel) -> (GlyphTable, PlacementMap) {
    let mut table = GlyphTable::default();
    let mut placement = PlacementMap::default();
    let mut seen: HashMap<GlyphBitmap, u8> = HashMap::new();

    for (line, column, glyph) in display.positions() {
        if glyph.is_blank() {
            continue;
        }
        // 32 positions at most, so the index always fits in a byte.
        let index = *seen.entry(*glyph).or_insert_with(|| {
            table.glyphs.push(*glyph);
            (table.glyphs.len() - 1) as u8
        });
        placement.slots[line][column] = Some(index);
    }

    (table, placement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_with(row: usize, column: usize) -> GlyphBitmap {
        let mut glyph = GlyphBitmap::blank();
        glyph.set(row, column, true);
        glyph
    }

    #[test]
    fn blank_display_yields_empty_table() {
        let (table, placement) = build_glyph_table(&DisplayModel::new());
        assert!(table.is_empty());
        assert_eq!(placement.occupied().count(), 0);
    }

    #[test]
    fn identical_bitmaps_share_an_index() {
        let mut display = DisplayModel::new();
        display.set_cell(0, 3, glyph_with(2, 2));
        display.set_cell(1, 9, glyph_with(2, 2));

        let (table, placement) = build_glyph_table(&display);
        assert_eq!(table.len(), 1);
        assert_eq!(placement.get(0, 3), Some(0));
        assert_eq!(placement.get(1, 9), Some(0));
    }

    #[test]
    fn indices_follow_first_appearance() {
        let mut display = DisplayModel::new();
        // Line 1 glyph appears later in the scan even though it is further left.
        display.set_cell(1, 0, glyph_with(0, 0));
        display.set_cell(0, 15, glyph_with(7, 4));
        display.set_cell(0, 2, glyph_with(3, 1));

        let (table, placement) = build_glyph_table(&display);
        assert_eq!(table.len(), 3);
        assert_eq!(placement.get(0, 2), Some(0));
        assert_eq!(placement.get(0, 15), Some(1));
        assert_eq!(placement.get(1, 0), Some(2));
        assert_eq!(table.get(0), Some(&glyph_with(3, 1)));
        assert_eq!(table.get(2), Some(&glyph_with(0, 0)));
    }

    #[test]
    fn single_pixel_difference_gets_new_index() {
        let mut a = glyph_with(4, 4);
        let b = a;
        a.set(0, 0, true);

        let mut display = DisplayModel::new();
        display.set_cell(0, 0, a);
        display.set_cell(0, 1, b);

        let (table, placement) = build_glyph_table(&display);
        assert_eq!(table.len(), 2);
        assert_ne!(placement.get(0, 0), placement.get(0, 1));
    }

    #[test]
    fn every_cell_distinct_is_not_capped() {
        let mut display = DisplayModel::new();
        for line in 0..LCD_LINES {
            for column in 0..LCD_COLUMNS {
                let n = line * LCD_COLUMNS + column;
                let mut glyph = GlyphBitmap::blank();
                // Encode n in binary across the first row and a marker pixel.
                for bit in 0..5 {
                    glyph.set(0, bit, n & (1 << bit) != 0);
                }
                glyph.set(7, 0, true);
                display.set_cell(line, column, glyph);
            }
        }
        let (table, placement) = build_glyph_table(&display);
        assert_eq!(table.len(), 32);
        assert_eq!(placement.get(1, 15), Some(31));
    }
}
