pub mod config;
mod canvas;
mod input;
mod menubar;
mod panel;
pub mod state;
mod status;
mod ui;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{cursor, event, execute, terminal};
use log::{error, info};

use input::Action;
use state::EditorState;
use ui::Layout;

/// Poll timeout while no preview is running.
const IDLE_POLL: Duration = Duration::from_millis(500);

pub struct Editor {
    state: EditorState,
}

impl Editor {
    pub fn open(path: &str) -> Result<Self> {
        let state = EditorState::open(path)?;
        Ok(Editor { state })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.main_loop(&mut stdout);

        let _ = execute!(
            stdout,
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    fn main_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.full_redraw(stdout)?;

        loop {
            let timeout = self
                .state
                .playback
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? {
                let (term_w, term_h) = terminal::size()?;
                let layout = Layout::compute(term_w, term_h);
                let action = input::handle_event(&mut self.state, event::read()?, &layout);

                match action {
                    Action::Continue => {}
                    Action::Redraw => self.full_redraw(stdout)?,
                    Action::Save => {
                        if let Err(e) = self.state.save() {
                            error!("save failed: {e:#}");
                            self.state.status_message = Some(format!("Save failed: {e}"));
                        }
                        self.full_redraw(stdout)?;
                    }
                    Action::Export => {
                        match self.state.export() {
                            Ok(path) => info!("exported sketch to {}", path.display()),
                            Err(e) => {
                                error!("export failed: {e:#}");
                                self.state.status_message = Some(format!("Export failed: {e}"));
                            }
                        }
                        self.full_redraw(stdout)?;
                    }
                    Action::Quit => break,
                }
            }

            if self.state.playback.advance(Instant::now()) {
                self.tick_redraw(stdout)?;
            }
        }

        Ok(())
    }

    fn full_redraw(&self, stdout: &mut io::Stdout) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let layout = Layout::compute(term_w, term_h);

        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        menubar::render_menubar(stdout, &layout, &self.state)?;
        canvas::render_lcd(stdout, &layout, &self.state)?;
        canvas::render_pixel_editor(stdout, &layout, &self.state)?;
        panel::render_options_panel(stdout, &layout, &self.state)?;
        panel::render_code_panel(stdout, &layout, &self.state)?;
        status::render_status(stdout, &layout, &self.state)?;

        stdout.flush()?;
        Ok(())
    }

    /// Only the LCD and the options (which show the tick) change per tick.
    fn tick_redraw(&self, stdout: &mut io::Stdout) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let layout = Layout::compute(term_w, term_h);

        canvas::render_lcd(stdout, &layout, &self.state)?;
        panel::render_options_panel(stdout, &layout, &self.state)?;

        stdout.flush()?;
        Ok(())
    }
}
