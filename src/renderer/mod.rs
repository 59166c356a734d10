//! Renderer: the deterministic LCD simulator.
//!
//! Takes a `RenderPlan` (from the engine) and works out what the display
//! shows on a given tick and which slot writes the generated loop performs
//! to get there.
//!
//! The renderer is pure and stateless. Given the same plan and tick, it
//! always produces the same frame.

use crate::engine::layout::RenderPlan;
use crate::types::{LCD_COLUMNS, LCD_LINES};

/// Content of one character slot: a glyph index, or `None` when blank.
pub type Slot = Option<u8>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LcdFrame {
    slots: [[Slot; LCD_COLUMNS]; LCD_LINES],
}

impl LcdFrame {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn get(&self, line: usize, column: usize) -> Slot {
        *self.slots.get(line)?.get(column)?
    }

    pub fn rows(&self) -> &[[Slot; LCD_COLUMNS]; LCD_LINES] {
        &self.slots
    }
}

/// One cursor move plus write performed by the sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWrite {
    pub line: u8,
    pub column: u8,
    pub slot: Slot,
}

/// What a single loop iteration of the sketch does to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Whether the iteration starts with `lcd.clear()`.
    pub clears: bool,
    pub writes: Vec<SlotWrite>,
}

pub struct Renderer;

impl Renderer {
    /// Rasterize the plan's placements for `tick` onto a 16x2 frame.
    pub fn frame(plan: &RenderPlan, tick: u64) -> LcdFrame {
        let mut frame = LcdFrame::blank();
        for placement in plan.placements() {
            let line = placement.line as usize;
            let column = plan.column_at(placement, tick);
            if line < LCD_LINES && column < LCD_COLUMNS {
                frame.slots[line][column] = Some(placement.glyph);
            }
        }
        frame
    }

    /// The writes of loop iteration `tick`.
    ///
    /// Static and naive plans clear and rewrite every glyph. Buffered plans
    /// diff against the previous tick's frame, or against a blank frame on the
    /// first tick.
    pub fn cycle(plan: &RenderPlan, tick: u64) -> Cycle {
        let next = Self::frame(plan, tick);
        if plan.redraws_partially() {
            let prev = match tick.checked_sub(1) {
                Some(previous) => Self::frame(plan, previous),
                None => LcdFrame::blank(),
            };
            Cycle {
                clears: false,
                writes: Self::diff(&prev, &next),
            }
        } else {
            Cycle {
                clears: true,
                writes: plan
                    .placements()
                    .iter()
                    .map(|p| SlotWrite {
                        line: p.line,
                        column: plan.column_at(p, tick) as u8,
                        slot: Some(p.glyph),
                    })
                    .collect(),
            }
        }
    }

    /// Slot-level diff between two frames, in scan order.
    pub fn diff(prev: &LcdFrame, next: &LcdFrame) -> Vec<SlotWrite> {
        let mut changes = Vec::new();
        for (line, (prev_row, next_row)) in prev.slots.iter().zip(next.slots.iter()).enumerate() {
            for (column, (prev_slot, next_slot)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_slot != next_slot {
                    changes.push(SlotWrite {
                        line: line as u8,
                        column: column as u8,
                        slot: *next_slot,
                    });
                }
            }
        }
        changes
    }
}
