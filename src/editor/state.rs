use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::engine::layout::RenderPlan;
use crate::engine::source::DesignFile;
use crate::player::scheduler::RepeatingTask;
use crate::session::Session;
use crate::types::{GenerationOptions, GlyphBitmap, LCD_COLUMNS, LCD_LINES};

use super::config::EditorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetDisplay,
    /// Quit despite unsaved changes.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Confirm {
        message: String,
        /// 0 = Yes, 1 = No
        selected: usize,
        action: ConfirmAction,
    },
}

// ---------------------------------------------------------------------------
// Animation preview
// ---------------------------------------------------------------------------

/// Preview playback. At most one repeating task exists; stopping it puts the
/// LCD back at tick 0, which is the unscrolled layout.
#[derive(Debug, Default)]
pub struct Playback {
    task: RepeatingTask,
    tick: u64,
}

impl Playback {
    pub fn is_playing(&self) -> bool {
        self.task.is_running()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Start playing `plan`. Static plans have nothing to animate, so this
    /// returns `false` and leaves playback stopped.
    pub fn start(&mut self, now: Instant, plan: &RenderPlan) -> bool {
        self.stop();
        if !plan.is_animated() {
            return false;
        }
        let interval = Duration::from_millis(plan.interval_ms() as u64);
        self.task.start(now, interval);
        debug!("preview started, every {interval:?}");
        true
    }

    pub fn stop(&mut self) {
        self.task.stop();
        self.tick = 0;
    }

    /// Parameters changed: if playing, stop and start again with the new plan.
    pub fn restart_if_playing(&mut self, now: Instant, plan: &RenderPlan) {
        if self.is_playing() {
            self.start(now, plan);
        }
    }

    /// Advance one tick if the task is due.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.task.poll(now) {
            self.tick += 1;
            true
        } else {
            false
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.task.time_until_due(now)
    }
}

// ---------------------------------------------------------------------------
// Editor state
// ---------------------------------------------------------------------------

pub struct EditorState {
    pub session: Session,
    pub file_path: PathBuf,
    /// Selected display cell.
    pub line: usize,
    pub column: usize,
    /// Pixel cursor inside the selected cell.
    pub pixel_row: usize,
    pub pixel_col: usize,
    pub mode: Mode,
    pub config: EditorConfig,
    pub dirty: bool,
    pub status_message: Option<String>,
    /// Lines of generated code scrolled off the top of the code panel.
    pub code_scroll: usize,
    pub playback: Playback,
    /// Pixel state applied while a mouse drag is in progress.
    pub paint: Option<bool>,
}

impl EditorState {
    pub fn open(path: &str) -> Result<Self> {
        let file_path = PathBuf::from(path);
        let session = if file_path.exists() {
            let (display, options) = DesignFile::load(&file_path)?
                .to_display()
                .with_context(|| format!("Invalid design in {path}"))?;
            Session::from_parts(display, options)
        } else {
            info!("{path} does not exist, starting a blank design");
            Session::new()
        };
        Ok(Self::with_session(session, file_path, EditorConfig::load()))
    }

    pub fn with_session(session: Session, file_path: PathBuf, config: EditorConfig) -> Self {
        EditorState {
            session,
            file_path,
            line: 0,
            column: 0,
            pixel_row: 0,
            pixel_col: 0,
            mode: Mode::Normal,
            config,
            dirty: false,
            status_message: None,
            code_scroll: 0,
            playback: Playback::default(),
            paint: None,
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let design = DesignFile::from_display(self.session.display(), self.session.options());
        design.save(&self.file_path)?;
        self.dirty = false;
        self.status_message = Some("Saved".into());
        Ok(())
    }

    /// Write the generated sketch next to the design file.
    pub fn export(&mut self) -> Result<PathBuf> {
        let path = sketch_path(&self.file_path);
        std::fs::write(&path, self.session.code().as_str())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.status_message = Some(format!("Exported {}", path.display()));
        Ok(path)
    }

    pub fn current_glyph(&self) -> GlyphBitmap {
        self.session
            .display()
            .cell(self.line, self.column)
            .copied()
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select_cell(&mut self, line: usize, column: usize) {
        if line < LCD_LINES && column < LCD_COLUMNS {
            self.line = line;
            self.column = column;
        }
    }

    /// Move the selected cell by a line/column delta, wrapping at the edges.
    pub fn move_cell(&mut self, d_line: isize, d_column: isize) {
        let line = (self.line as isize + d_line).rem_euclid(LCD_LINES as isize);
        let column = (self.column as isize + d_column).rem_euclid(LCD_COLUMNS as isize);
        self.select_cell(line as usize, column as usize);
    }

    /// Step through all 32 cells in scan order.
    pub fn step_cell(&mut self, delta: isize) {
        let total = (LCD_LINES * LCD_COLUMNS) as isize;
        let index = (self.line * LCD_COLUMNS + self.column) as isize;
        let next = (index + delta).rem_euclid(total) as usize;
        self.select_cell(next / LCD_COLUMNS, next % LCD_COLUMNS);
    }

    // -----------------------------------------------------------------------
    // Edits (all routed through the session)
    // -----------------------------------------------------------------------

    pub fn toggle_pixel_at_cursor(&mut self) {
        if self
            .session
            .toggle_pixel(self.line, self.column, self.pixel_row, self.pixel_col)
            .is_some()
        {
            self.dirty = true;
        }
    }

    /// Start a drag on `(row, col)`: paint the inverse of that pixel's state
    /// for the rest of the drag.
    pub fn begin_paint(&mut self, row: usize, col: usize) {
        let Some(current) = self.current_glyph().get(row, col) else {
            return;
        };
        self.paint = Some(!current);
        self.pixel_row = row;
        self.pixel_col = col;
        self.paint_at(row, col);
    }

    pub fn paint_at(&mut self, row: usize, col: usize) {
        if let Some(on) = self.paint {
            if self.session.set_pixel(self.line, self.column, row, col, on) {
                self.dirty = true;
            }
        }
    }

    pub fn end_paint(&mut self) {
        self.paint = None;
    }

    pub fn clear_cell(&mut self) {
        if self.session.clear_cell(self.line, self.column) {
            self.dirty = true;
        }
    }

    pub fn reset_display(&mut self) {
        self.session.reset_display();
        self.playback.stop();
        self.dirty = true;
    }

    pub fn copy_cell(&mut self) {
        if self.session.copy_cell(self.line, self.column) {
            self.status_message = Some(format!("Copied cell ({}, {})", self.line, self.column));
        }
    }

    pub fn paste_cell(&mut self) {
        if self.session.clipboard().is_none() {
            return;
        }
        if self.session.paste_cell(self.line, self.column) {
            self.dirty = true;
        }
        self.status_message = Some(format!("Pasted into ({}, {})", self.line, self.column));
    }

    /// Change options; a running preview restarts with the new parameters.
    pub fn update_options(&mut self, edit: impl FnOnce(&mut GenerationOptions)) {
        if self.session.update_options(edit) {
            self.dirty = true;
            let plan = self.session.plan().clone();
            self.playback.restart_if_playing(Instant::now(), &plan);
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.playback.is_playing() {
            self.playback.stop();
            self.status_message = None;
        } else if !self.playback.start(Instant::now(), self.session.plan()) {
            self.status_message = Some("Enable scrolling to preview an animation".into());
        }
    }
}

/// `design.json` → `design.ino`.
pub fn sketch_path(design: &Path) -> PathBuf {
    design.with_extension("ino")
}
