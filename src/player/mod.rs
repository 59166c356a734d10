//! Player: terminal preview of a design's animation.
//!
//! Compiles the design once and drives the simulated LCD from a
//! `RepeatingTask`. Each tick only the slots that changed are repainted.
//! The LCD drawing helpers here are shared with the editor.

pub mod scheduler;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};
use log::debug;

use crate::engine::{Compiled, Engine};
use crate::engine::glyphs::GlyphTable;
use crate::menubar::print_menu_item;
use crate::renderer::{LcdFrame, Renderer, Slot};
use crate::types::{DisplayModel, GLYPH_COLUMNS, GlyphBitmap, GenerationOptions, LCD_COLUMNS, LCD_LINES};

use scheduler::RepeatingTask;

/// Terminal rows per character cell: two pixel rows per half-block.
pub const CELL_ROWS: u16 = 4;
/// Terminal columns per character cell.
pub const CELL_COLS: u16 = GLYPH_COLUMNS as u16;
/// LCD box size including its border and one-column/one-row cell gaps.
pub const LCD_BOX_WIDTH: u16 = LCD_COLUMNS as u16 * (CELL_COLS + 1) + 1;
pub const LCD_BOX_HEIGHT: u16 = LCD_LINES as u16 * (CELL_ROWS + 1) + 1;

/// Rows reserved above the LCD for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Poll timeout while nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(500);

pub struct Player {
    compiled: Compiled,
    task: RepeatingTask,
    tick: u64,
    frame: LcdFrame,
}

impl Player {
    pub fn new(display: &DisplayModel, options: &GenerationOptions) -> Self {
        let compiled = Engine::compile(display, options);
        let frame = Renderer::frame(&compiled.plan, 0);
        Self {
            compiled,
            task: RepeatingTask::new(),
            tick: 0,
            frame,
        }
    }

    /// Play the design in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        // +2: one row for menu bar, one row for status bar
        if term_w < LCD_BOX_WIDTH || term_h < LCD_BOX_HEIGHT + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                LCD_BOX_WIDTH,
                LCD_BOX_HEIGHT + 2,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.resume();
        self.render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        loop {
            let timeout = self
                .task
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(key) => {
                        use event::KeyCode::*;
                        match key.code {
                            Char('q') | Esc => break,
                            Char(' ') => {
                                if self.task.is_running() {
                                    self.task.stop();
                                } else {
                                    self.resume();
                                }
                                self.render_status(stdout)?;
                            }
                            Right => self.step_to(stdout, self.tick + 1)?,
                            Left => self.step_to(stdout, self.tick.saturating_sub(1))?,
                            Home => self.step_to(stdout, 0)?,
                            _ => {}
                        }
                    }
                    event::Event::Resize(_, _) => {
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                        self.render_full(stdout)?;
                        self.render_status(stdout)?;
                    }
                    _ => {}
                }
            }

            if self.task.poll(Instant::now()) {
                self.step_to(stdout, self.tick + 1)?;
            }
        }

        Ok(())
    }

    fn resume(&mut self) {
        if self.compiled.plan.is_animated() {
            let interval = Duration::from_millis(self.compiled.plan.interval_ms() as u64);
            self.task.start(Instant::now(), interval);
            debug!("preview running every {interval:?}");
        }
    }

    fn step_to(&mut self, stdout: &mut io::Stdout, tick: u64) -> Result<()> {
        self.tick = tick;
        let next = Renderer::frame(&self.compiled.plan, tick);
        for change in Renderer::diff(&self.frame, &next) {
            let line = change.line as usize;
            let column = change.column as usize;
            draw_slot(stdout, 0, CANVAS_OFFSET, line, column, self.glyph(change.slot), false)?;
        }
        self.frame = next;
        self.render_status(stdout)?;
        Ok(())
    }

    fn glyph(&self, slot: Slot) -> Option<&GlyphBitmap> {
        slot.and_then(|index| self.compiled.glyphs.get(index))
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let items: &[&str] = &[
            "[Space] play/pause",
            "[←][→] step",
            "[Home] first",
            "[q][Esc] quit",
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item, false)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        draw_lcd(stdout, 0, CANVAS_OFFSET, &self.frame, &self.compiled.glyphs, None)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = CANVAS_OFFSET + LCD_BOX_HEIGHT;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let plan = &self.compiled.plan;
        let status = if plan.is_animated() {
            format!(
                " Tick {} (offset {}) | every {} ms | {} ",
                self.tick,
                self.tick % LCD_COLUMNS as u64,
                plan.interval_ms(),
                if self.task.is_running() { "playing" } else { "paused" },
            )
        } else {
            " Static layout | scrolling is off ".to_string()
        };

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LCD drawing
// ---------------------------------------------------------------------------

fn lcd_style() -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    cs.foreground_color = Some(style::Color::White);
    cs.background_color = Some(style::Color::DarkBlue);
    cs
}

/// Half-block character for a pair of vertically stacked pixels.
pub fn half_block(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '\u{2588}',
        (true, false) => '\u{2580}',
        (false, true) => '\u{2584}',
        (false, false) => ' ',
    }
}

/// Draw the LCD border and every slot of `frame` with its top-left corner at
/// `(x, y)`. `highlight` marks one cell (line, column) in reverse video.
pub fn draw_lcd(
    stdout: &mut io::Stdout,
    x: u16,
    y: u16,
    frame: &LcdFrame,
    glyphs: &GlyphTable,
    highlight: Option<(usize, usize)>,
) -> Result<()> {
    let inner = "\u{2500}".repeat(LCD_BOX_WIDTH as usize - 2);
    queue!(
        stdout,
        cursor::MoveTo(x, y),
        style::Print(format!("\u{250c}{inner}\u{2510}")),
        cursor::MoveTo(x, y + LCD_BOX_HEIGHT - 1),
        style::Print(format!("\u{2514}{inner}\u{2518}")),
    )?;
    for row in 1..LCD_BOX_HEIGHT - 1 {
        queue!(
            stdout,
            cursor::MoveTo(x, y + row),
            style::Print("\u{2502}"),
            cursor::MoveTo(x + LCD_BOX_WIDTH - 1, y + row),
            style::Print("\u{2502}"),
        )?;
    }

    for (line, slots) in frame.rows().iter().enumerate() {
        for (column, slot) in slots.iter().enumerate() {
            let glyph = slot.and_then(|index| glyphs.get(index));
            let selected = highlight == Some((line, column));
            draw_slot(stdout, x, y, line, column, glyph, selected)?;
        }
    }
    Ok(())
}

/// Draw one character slot of an LCD box whose top-left corner is `(x, y)`.
pub fn draw_slot(
    stdout: &mut io::Stdout,
    x: u16,
    y: u16,
    line: usize,
    column: usize,
    glyph: Option<&GlyphBitmap>,
    selected: bool,
) -> Result<()> {
    let blank = GlyphBitmap::blank();
    let glyph = glyph.unwrap_or(&blank);
    let mut cs = lcd_style();
    if selected {
        cs.attributes.set(style::Attribute::Reverse);
    }

    let (sx, sy) = slot_origin(x, y, line, column);
    let rows = glyph.rows();
    for pair in 0..CELL_ROWS as usize {
        let text: String = (0..GLYPH_COLUMNS)
            .map(|c| half_block(rows[pair * 2][c], rows[pair * 2 + 1][c]))
            .collect();
        queue!(
            stdout,
            cursor::MoveTo(sx, sy + pair as u16),
            style::PrintStyledContent(style::StyledContent::new(cs, text)),
        )?;
    }
    Ok(())
}

/// Terminal position of a slot's top-left corner inside an LCD box at `(x, y)`.
pub fn slot_origin(x: u16, y: u16, line: usize, column: usize) -> (u16, u16) {
    (
        x + 1 + column as u16 * (CELL_COLS + 1),
        y + 1 + line as u16 * (CELL_ROWS + 1),
    )
}

/// Inverse of `slot_origin`: which slot, if any, covers terminal cell `(tx, ty)`.
pub fn slot_at(x: u16, y: u16, tx: u16, ty: u16) -> Option<(usize, usize)> {
    let dx = tx.checked_sub(x + 1)?;
    let dy = ty.checked_sub(y + 1)?;
    let column = (dx / (CELL_COLS + 1)) as usize;
    let line = (dy / (CELL_ROWS + 1)) as usize;
    let on_gap = dx % (CELL_COLS + 1) == CELL_COLS || dy % (CELL_ROWS + 1) == CELL_ROWS;
    if on_gap || line >= LCD_LINES || column >= LCD_COLUMNS {
        return None;
    }
    Some((line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcd_box_fits_sixteen_by_two_cells() {
        assert_eq!(LCD_BOX_WIDTH, 97);
        assert_eq!(LCD_BOX_HEIGHT, 11);
    }

    #[test]
    fn slot_at_inverts_slot_origin() {
        for line in 0..LCD_LINES {
            for column in 0..LCD_COLUMNS {
                let (sx, sy) = slot_origin(3, 2, line, column);
                assert_eq!(slot_at(3, 2, sx, sy), Some((line, column)));
                assert_eq!(slot_at(3, 2, sx + CELL_COLS - 1, sy + CELL_ROWS - 1), Some((line, column)));
            }
        }
        // Border and gaps map to nothing.
        assert_eq!(slot_at(3, 2, 3, 2), None);
        assert_eq!(slot_at(3, 2, 3 + 1 + CELL_COLS, 3), None);
        assert_eq!(slot_at(3, 2, 10, 2 + 1 + CELL_ROWS), None);
    }

    #[test]
    fn half_blocks_cover_all_pairs() {
        assert_eq!(half_block(false, false), ' ');
        assert_eq!(half_block(true, false), '▀');
        assert_eq!(half_block(false, true), '▄');
        assert_eq!(half_block(true, true), '█');
    }
}
