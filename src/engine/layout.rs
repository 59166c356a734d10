//! Layout planner.
//!
//! Decides where each glyph is drawn on every animation tick and whether
//! the sketch redraws the whole display or only the slots that changed.

use crate::types::{
    GenerationOptions, LCD_COLUMNS, NAIVE_SCROLL_INTERVAL_MS, ScrollDirection,
};

use super::glyphs::PlacementMap;

/// Delay at the end of every static loop iteration.
pub const STATIC_HOLD_MS: u32 = 2000;

/// A glyph at its unscrolled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub line: u8,
    pub column: u8,
    pub glyph: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    /// Every glyph once at its own position; nothing moves.
    Static { placements: Vec<Placement> },
    /// Clear and rewrite everything every tick at the fixed naive cadence.
    NaiveScroll {
        placements: Vec<Placement>,
        direction: ScrollDirection,
    },
    /// Keep a previous-frame buffer and only rewrite slots that changed.
    BufferedScroll {
        placements: Vec<Placement>,
        direction: ScrollDirection,
        interval_ms: u32,
    },
}

impl RenderPlan {
    pub fn placements(&self) -> &[Placement] {
        match self {
            RenderPlan::Static { placements }
            | RenderPlan::NaiveScroll { placements, .. }
            | RenderPlan::BufferedScroll { placements, .. } => placements,
        }
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        match self {
            RenderPlan::Static { .. } => None,
            RenderPlan::NaiveScroll { direction, .. }
            | RenderPlan::BufferedScroll { direction, .. } => Some(*direction),
        }
    }

    /// Delay between two loop iterations of the generated sketch.
    pub fn interval_ms(&self) -> u32 {
        match self {
            RenderPlan::Static { .. } => STATIC_HOLD_MS,
            RenderPlan::NaiveScroll { .. } => NAIVE_SCROLL_INTERVAL_MS,
            RenderPlan::BufferedScroll { interval_ms, .. } => *interval_ms,
        }
    }

    pub fn is_animated(&self) -> bool {
        !matches!(self, RenderPlan::Static { .. })
    }

    /// Whether a loop iteration writes only the slots that differ from the
    /// previous frame.
    pub fn redraws_partially(&self) -> bool {
        matches!(self, RenderPlan::BufferedScroll { .. })
    }

    /// Column at which `placement` is drawn on `tick`.
    pub fn column_at(&self, placement: &Placement, tick: u64) -> usize {
        match self.direction() {
            None => placement.column as usize,
            Some(direction) => {
                let offset = (tick % LCD_COLUMNS as u64) as i64;
                scroll_column(placement.column as usize, offset, direction)
            }
        }
    }
}

/// Shift `column` by `offset` in `direction`, wrapping into `[0, 16)`.
///
/// Left subtracts the offset so content travels right to left; right adds it.
/// Any offset sign or magnitude is accepted.
pub fn scroll_column(column: usize, offset: i64, direction: ScrollDirection) -> usize {
    let width = LCD_COLUMNS as i64;
    let offset = offset.rem_euclid(width);
    let shifted = match direction {
        ScrollDirection::Left => column as i64 - offset,
        ScrollDirection::Right => column as i64 + offset,
    };
    shifted.rem_euclid(width) as usize
}

pub fn plan_layout(placement: &PlacementMap, options: &GenerationOptions) -> RenderPlan {
    let placements: Vec<Placement> = placement
        .occupied()
        .map(|(line, column, glyph)| Placement {
            line: line as u8,
            column: column as u8,
            glyph,
        })
        .collect();

    if !options.scrolling_enabled {
        return RenderPlan::Static { placements };
    }

    if options.buffered_scroll {
        RenderPlan::BufferedScroll {
            placements,
            direction: options.scroll_direction,
            interval_ms: options.scroll_interval_ms.max(1),
        }
    } else {
        RenderPlan::NaiveScroll {
            placements,
            direction: options.scroll_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::glyphs::build_glyph_table;
    use crate::types::{DisplayModel, GlyphBitmap};

    fn placement_with_glyph_at(line: usize, column: usize) -> PlacementMap {
        let mut display = DisplayModel::new();
        let mut glyph = GlyphBitmap::blank();
        glyph.set(0, 0, true);
        display.set_cell(line, column, glyph);
        build_glyph_table(&display).1
    }

    #[test]
    fn left_scroll_wraps_past_column_zero() {
        assert_eq!(scroll_column(5, 1, ScrollDirection::Left), 4);
        assert_eq!(scroll_column(5, 5, ScrollDirection::Left), 0);
        assert_eq!(scroll_column(5, 6, ScrollDirection::Left), 15);
    }

    #[test]
    fn right_scroll_wraps_past_last_column() {
        assert_eq!(scroll_column(5, 1, ScrollDirection::Right), 6);
        assert_eq!(scroll_column(15, 1, ScrollDirection::Right), 0);
    }

    #[test]
    fn scroll_column_stays_in_range_for_any_offset() {
        for column in 0..LCD_COLUMNS {
            for offset in [-1_000_003, -17, -16, -1, 0, 1, 15, 16, 31, 1_000_003, i64::MAX / 2] {
                for direction in [ScrollDirection::Left, ScrollDirection::Right] {
                    let c = scroll_column(column, offset, direction);
                    assert!(c < LCD_COLUMNS, "{column} {offset} {direction:?} -> {c}");
                }
            }
        }
    }

    #[test]
    fn options_select_plan_variant() {
        let placement = placement_with_glyph_at(0, 5);
        let mut options = GenerationOptions::default();
        assert!(matches!(
            plan_layout(&placement, &options),
            RenderPlan::Static { .. }
        ));

        options.scrolling_enabled = true;
        options.scroll_interval_ms = 125;
        let plan = plan_layout(&placement, &options);
        assert!(matches!(plan, RenderPlan::NaiveScroll { .. }));
        assert_eq!(plan.interval_ms(), NAIVE_SCROLL_INTERVAL_MS);

        options.buffered_scroll = true;
        let plan = plan_layout(&placement, &options);
        assert!(matches!(plan, RenderPlan::BufferedScroll { .. }));
        assert_eq!(plan.interval_ms(), 125);
        assert!(plan.redraws_partially());
    }

    #[test]
    fn buffering_without_scrolling_stays_static() {
        let placement = placement_with_glyph_at(1, 1);
        let options = GenerationOptions {
            buffered_scroll: true,
            ..Default::default()
        };
        let plan = plan_layout(&placement, &options);
        assert!(matches!(plan, RenderPlan::Static { .. }));
        assert_eq!(plan.column_at(&plan.placements()[0], 7), 1);
    }

    #[test]
    fn column_at_follows_tick_and_wraps_offset() {
        let placement = placement_with_glyph_at(0, 5);
        let options = GenerationOptions {
            scrolling_enabled: true,
            ..Default::default()
        };
        let plan = plan_layout(&placement, &options);
        let glyph = plan.placements()[0];
        assert_eq!(plan.column_at(&glyph, 0), 5);
        assert_eq!(plan.column_at(&glyph, 1), 4);
        assert_eq!(plan.column_at(&glyph, 6), 15);
        assert_eq!(plan.column_at(&glyph, 16), 5);
    }
}
