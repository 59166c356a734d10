//! Session: the single owner of the display and its options.
//!
//! Every mutation goes through here and reruns the engine, so the code the
//! editor shows always matches the model. Nothing is cached across runs
//! except the last result.

use log::trace;

use crate::engine::glyphs::GlyphTable;
use crate::engine::layout::RenderPlan;
use crate::engine::{Compiled, Engine};
use crate::types::{DisplayModel, GeneratedCode, GenerationOptions, GlyphBitmap};

pub struct Session {
    display: DisplayModel,
    options: GenerationOptions,
    /// Glyph copied with `copy_cell`, if any.
    clipboard: Option<GlyphBitmap>,
    compiled: Compiled,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_parts(DisplayModel::new(), GenerationOptions::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(display: DisplayModel, options: GenerationOptions) -> Self {
        let compiled = Engine::compile(&display, &options);
        Session {
            display,
            options,
            clipboard: None,
            compiled,
        }
    }

    pub fn display(&self) -> &DisplayModel {
        &self.display
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn code(&self) -> &GeneratedCode {
        &self.compiled.code
    }

    pub fn glyph_table(&self) -> &GlyphTable {
        &self.compiled.glyphs
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.compiled.plan
    }

    pub fn clipboard(&self) -> Option<&GlyphBitmap> {
        self.clipboard.as_ref()
    }

    // -----------------------------------------------------------------------
    // Model edits
    // -----------------------------------------------------------------------

    /// Set one pixel. Returns `true` when something changed.
    pub fn set_pixel(&mut self, line: usize, column: usize, row: usize, col: usize, on: bool) -> bool {
        let Some(cell) = self.display.cell_mut(line, column) else {
            return false;
        };
        if cell.get(row, col) == Some(on) || !cell.set(row, col, on) {
            return false;
        }
        self.on_model_changed();
        true
    }

    /// Flip one pixel and return its new state.
    pub fn toggle_pixel(&mut self, line: usize, column: usize, row: usize, col: usize) -> Option<bool> {
        let state = self.display.cell_mut(line, column)?.toggle(row, col)?;
        self.on_model_changed();
        Some(state)
    }

    pub fn set_cell(&mut self, line: usize, column: usize, glyph: GlyphBitmap) -> bool {
        if self.display.cell(line, column) == Some(&glyph) {
            return false;
        }
        let changed = self.display.set_cell(line, column, glyph);
        if changed {
            self.on_model_changed();
        }
        changed
    }

    pub fn clear_cell(&mut self, line: usize, column: usize) -> bool {
        self.set_cell(line, column, GlyphBitmap::blank())
    }

    pub fn reset_display(&mut self) {
        self.display = DisplayModel::new();
        self.on_model_changed();
    }

    /// Remember a cell's bitmap for a later `paste_cell`.
    pub fn copy_cell(&mut self, line: usize, column: usize) -> bool {
        match self.display.cell(line, column) {
            Some(glyph) => {
                self.clipboard = Some(*glyph);
                true
            }
            None => false,
        }
    }

    /// Paste the copied bitmap. Does nothing when nothing has been copied.
    pub fn paste_cell(&mut self, line: usize, column: usize) -> bool {
        match self.clipboard {
            Some(glyph) => self.set_cell(line, column, glyph),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    pub fn set_options(&mut self, options: GenerationOptions) -> bool {
        let options = GenerationOptions {
            scroll_interval_ms: options.scroll_interval_ms.max(1),
            ..options
        };
        if options == self.options {
            return false;
        }
        self.options = options;
        self.on_options_changed();
        true
    }

    pub fn update_options(&mut self, edit: impl FnOnce(&mut GenerationOptions)) -> bool {
        let mut options = self.options;
        edit(&mut options);
        self.set_options(options)
    }

    fn on_model_changed(&mut self) {
        trace!("display changed, regenerating");
        self.regenerate();
    }

    fn on_options_changed(&mut self) {
        trace!("options changed to {:?}, regenerating", self.options);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        self.compiled = Engine::compile(&self.display, &self.options);
    }
}
